//! Paired Device Resolver
//!
//! Queries the host's Bluetooth daemon for its paired-device registry
//! and maps human-readable aliases to BLE addresses. Runs once at
//! startup, before any session is opened; the bus handle is constructed
//! by the caller and passed in.

use crate::error::TransportError;
use bluer::Adapter;
use tracing::debug;

/// A device the host Bluetooth stack reports as paired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedDevice {
    /// Host-assigned human-readable name; the user-facing selector.
    pub alias: String,
    /// BLE address, the natural key (`AA:BB:CC:DD:EE:FF`).
    pub address: String,
}

/// Raw per-device properties as reported by the daemon, with explicit
/// defaults already applied for absent values.
#[derive(Debug, Clone)]
struct DeviceRecord {
    paired: bool,
    alias: String,
    address: String,
}

/// List all devices currently paired with this host.
///
/// Enumerates the adapter's known devices and keeps only those whose
/// `Paired` property is true. A bus or enumeration failure is a
/// [`TransportError`]; discovery is a precondition for everything else,
/// so callers treat it as fatal.
pub async fn list_paired_devices(adapter: &Adapter) -> Result<Vec<PairedDevice>, TransportError> {
    let mut records = Vec::new();

    for addr in adapter.device_addresses().await? {
        let device = adapter.device(addr)?;
        // Absent properties fall back to explicit defaults rather than
        // failing the whole enumeration.
        let record = DeviceRecord {
            paired: device.is_paired().await.unwrap_or(false),
            alias: device.alias().await.unwrap_or_default(),
            address: addr.to_string(),
        };
        debug!(
            "device {} alias={:?} paired={}",
            record.address, record.alias, record.paired
        );
        records.push(record);
    }

    Ok(filter_paired(records))
}

/// Keep only paired devices, in the host's enumeration order.
fn filter_paired(records: Vec<DeviceRecord>) -> Vec<PairedDevice> {
    records
        .into_iter()
        .filter(|r| r.paired)
        .map(|r| PairedDevice {
            alias: r.alias,
            address: r.address,
        })
        .collect()
}

/// Select a device by exact alias match.
///
/// Aliases are not guaranteed unique; the first match wins.
pub fn find_by_alias<'a>(devices: &'a [PairedDevice], alias: &str) -> Option<&'a PairedDevice> {
    devices.iter().find(|d| d.alias == alias)
}
