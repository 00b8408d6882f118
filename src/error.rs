//! Error taxonomy for device discovery and the UART session.

use thiserror::Error;
use uuid::Uuid;

/// A failed management-bus or GATT operation.
///
/// During discovery these are fatal to the program; inside a session
/// they end that session only, after teardown has run.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A BlueZ operation over the system bus failed.
    #[error("bluetooth bus operation failed: {0}")]
    Bus(#[from] bluer::Error),

    /// The device address string is not a valid BLE address.
    #[error("invalid device address '{0}'")]
    InvalidAddress(String),

    /// The connected device does not expose the UART service.
    #[error("UART service {0} not found on device")]
    ServiceNotFound(Uuid),

    /// The UART service is missing one of its fixed characteristics.
    #[error("characteristic {0} not found in UART service")]
    CharacteristicNotFound(Uuid),

    /// Enabling notifications on the inbound characteristic failed.
    #[error("failed to start notifications: {0}")]
    Subscribe(String),

    /// A GATT write to the outbound characteristic failed.
    #[error("GATT write failed: {0}")]
    Write(String),

    /// The peripheral dropped the connection while the session was active.
    #[error("connection to device lost")]
    ConnectionLost,
}
