//! UART Session Controller
//!
//! Owns the lifecycle of a single GATT connection: connect, subscribe
//! to inbound notifications, run the interactive send/receive loop, and
//! guarantee teardown on every exit path.
//!
//! The loop is single-threaded and event-driven: inbound frames arrive
//! through the subscription channel and are printed immediately, user
//! lines arrive through the input channel one at a time, and an
//! interrupt counts as a normal end of session. Writes are serialized;
//! the next line is not processed until the previous write resolved.

use crate::bluetooth::protocol;
use crate::bluetooth::transport::{UartConnection, UartTransport};
use crate::error::TransportError;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Outcome of handling one entered line.
enum LoopStep {
    /// Line transmitted, keep going.
    Continue,
    /// Quit sentinel, nothing sent.
    Quit,
    /// Transport failure, session is over.
    Fatal(TransportError),
}

/// Why the active loop ended.
enum SessionEnd {
    Quit,
    EndOfInput,
    Interrupted,
    Fatal(TransportError),
}

/// Run one interactive session against the device at `address`.
///
/// Blocks until the user quits, input ends, or a transport error
/// occurs. A connect failure is returned to the caller; every failure
/// after a successful connect is reported here and still routes through
/// teardown (unsubscribe, then close), so the caller sees `Ok`.
pub async fn run_interactive_session(
    transport: &dyn UartTransport,
    address: &str,
    input_source: impl FnOnce() -> mpsc::UnboundedReceiver<String>,
) -> Result<(), TransportError> {
    println!("Connecting to {address}...");
    let mut conn = transport.connect(address).await?;
    info!("connected to {address}");
    println!("Connected to {address}");

    // Subscribe failure skips the loop entirely but still tears down
    // the partially set up connection.
    match conn.subscribe().await {
        Ok(notify_rx) => {
            println!("Enter commands to send to the device. Type 'q' to quit.\n");
            match session_loop(conn.as_mut(), notify_rx, input_source()).await {
                SessionEnd::Quit => println!("Exiting..."),
                SessionEnd::EndOfInput => info!("input closed, ending session"),
                SessionEnd::Interrupted => println!("\nInterrupted, exiting..."),
                SessionEnd::Fatal(e) => error!("error during communication: {e}"),
            }
        }
        Err(e) => error!("failed to start notifications: {e}"),
    }

    conn.unsubscribe().await;
    conn.close().await;
    println!("Disconnected.");

    Ok(())
}

/// The active send/receive loop.
///
/// Notifications are surfaced as they arrive, interleaved with the wait
/// for the next user line. Exactly one write is issued per non-quit
/// line.
async fn session_loop(
    conn: &mut dyn UartConnection,
    mut notify_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    mut input_rx: mpsc::UnboundedReceiver<String>,
) -> SessionEnd {
    loop {
        tokio::select! {
            frame = notify_rx.recv() => match frame {
                Some(frame) => println!("<< {}", protocol::decode_notification(&frame)),
                // The forwarder only stops when the peripheral is gone.
                None => return SessionEnd::Fatal(TransportError::ConnectionLost),
            },
            line = input_rx.recv() => match line {
                None => return SessionEnd::EndOfInput,
                Some(line) => match handle_line(conn, &line).await {
                    LoopStep::Continue => {}
                    LoopStep::Quit => return SessionEnd::Quit,
                    LoopStep::Fatal(e) => return SessionEnd::Fatal(e),
                },
            },
            _ = tokio::signal::ctrl_c() => return SessionEnd::Interrupted,
        }
    }
}

/// Handle one entered line: quit, or normalize and transmit.
async fn handle_line(conn: &mut dyn UartConnection, line: &str) -> LoopStep {
    if protocol::is_quit_command(line) {
        return LoopStep::Quit;
    }

    let payload = protocol::normalize_command(line);
    match conn.write(payload.as_bytes()).await {
        Ok(()) => LoopStep::Continue,
        Err(e) => {
            warn!("write failed, ending session");
            LoopStep::Fatal(e)
        }
    }
}
