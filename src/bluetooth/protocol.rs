//! UART-over-BLE Protocol
//!
//! Nordic UART Service (NUS) definitions and the line handling rules
//! for the interactive session: quit detection, outbound normalization,
//! and best-effort decoding of inbound frames.

use uuid::Uuid;

/// Nordic UART Service UUID
pub const UART_SERVICE_UUID: Uuid = Uuid::from_u128(0x6e400001_b5a3_f393_e0a9_e50e24dcca9e);

/// Write Characteristic UUID - commands sent to the device
pub const UART_WRITE_UUID: Uuid = Uuid::from_u128(0x6e400002_b5a3_f393_e0a9_e50e24dcca9e);

/// Notify Characteristic UUID - responses received from the device
pub const UART_NOTIFY_UUID: Uuid = Uuid::from_u128(0x6e400003_b5a3_f393_e0a9_e50e24dcca9e);

/// Sentinel that ends the interactive session instead of being transmitted
pub const QUIT_COMMAND: &str = "q";

/// Check whether an entered line is the quit sentinel.
///
/// Surrounding whitespace and ASCII case are ignored, so `q`, `Q` and
/// `  q  ` all end the session.
pub fn is_quit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(QUIT_COMMAND)
}

/// Normalize a command line for transmission.
///
/// The device expects line-terminated commands; exactly one trailing
/// newline is guaranteed, and a line that already carries one gains no
/// extra terminator.
pub fn normalize_command(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_owned()
    } else {
        format!("{line}\n")
    }
}

/// Decode an inbound notification frame as text.
///
/// Decoding is total: invalid UTF-8 degrades to replacement characters
/// rather than failing the session. Surrounding whitespace (including
/// the device's line terminator) is stripped.
pub fn decode_notification(frame: &[u8]) -> String {
    String::from_utf8_lossy(frame).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuids_match_nus_profile() {
        assert_eq!(
            UART_SERVICE_UUID.to_string(),
            "6e400001-b5a3-f393-e0a9-e50e24dcca9e"
        );
        assert_eq!(
            UART_WRITE_UUID.to_string(),
            "6e400002-b5a3-f393-e0a9-e50e24dcca9e"
        );
        assert_eq!(
            UART_NOTIFY_UUID.to_string(),
            "6e400003-b5a3-f393-e0a9-e50e24dcca9e"
        );
    }

    #[test]
    fn test_quit_command_variants() {
        assert!(is_quit_command("q"));
        assert!(is_quit_command("Q"));
        assert!(is_quit_command("  q  "));
        assert!(is_quit_command("\tQ\n"));
        assert!(!is_quit_command("quit"));
        assert!(!is_quit_command("move 10"));
        assert!(!is_quit_command(""));
    }

    #[test]
    fn test_normalize_appends_single_newline() {
        assert_eq!(normalize_command("move 10"), "move 10\n");
        assert_eq!(normalize_command(""), "\n");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        assert_eq!(normalize_command("move 10\n"), "move 10\n");
        assert_eq!(normalize_command(&normalize_command("stop")), "stop\n");
    }

    #[test]
    fn test_decode_valid_utf8() {
        assert_eq!(decode_notification(b"ok\r\n"), "ok");
        assert_eq!(decode_notification(b"pos 4 2"), "pos 4 2");
    }

    #[test]
    fn test_decode_never_fails_on_malformed_bytes() {
        let garbled = [0xff, 0xfe, b'o', b'k', 0x80];
        let text = decode_notification(&garbled);
        assert!(text.contains("ok"));
        assert!(text.contains('\u{fffd}'));
    }
}
