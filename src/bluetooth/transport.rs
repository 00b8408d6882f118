//! GATT Transport
//!
//! The seam between the session controller and the platform BLE stack:
//! object-safe traits for connect / subscribe / write / teardown, plus
//! the BlueZ-backed implementation used in production. Tests substitute
//! a scripted fake behind the same traits.

use crate::bluetooth::protocol;
use crate::error::TransportError;
use async_trait::async_trait;
use bluer::gatt::remote::Characteristic;
use bluer::{Adapter, Address, Device};
use futures::{pin_mut, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Opens GATT connections to UART peripherals.
#[async_trait]
pub trait UartTransport: Send + Sync {
    /// Connect to the device at `address` and locate the UART
    /// characteristics. Failure is reported to the user, never retried.
    async fn connect(&self, address: &str) -> Result<Box<dyn UartConnection>, TransportError>;
}

/// One open GATT connection to a UART peripheral.
///
/// Exclusively owned by the session loop for the loop's lifetime.
/// `unsubscribe` and `close` are best-effort and must each be attempted
/// exactly once on every exit path.
#[async_trait]
pub trait UartConnection: Send {
    /// Start notifications on the inbound characteristic.
    ///
    /// Frames are delivered through the returned channel in transport
    /// order. The delivering side never blocks and never issues writes;
    /// the channel closing means the peripheral is gone.
    async fn subscribe(&mut self) -> Result<mpsc::UnboundedReceiver<Vec<u8>>, TransportError>;

    /// Write one outbound frame. Callers serialize writes; a new write
    /// is only issued once the previous one has resolved.
    async fn write(&mut self, payload: &[u8]) -> Result<(), TransportError>;

    /// Stop the notification subscription. Best-effort.
    async fn unsubscribe(&mut self);

    /// Close the connection. Best-effort.
    async fn close(&mut self);
}

/// BlueZ-backed transport over the system D-Bus.
pub struct BluerTransport {
    adapter: Adapter,
}

impl BluerTransport {
    pub fn new(adapter: Adapter) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl UartTransport for BluerTransport {
    async fn connect(&self, address: &str) -> Result<Box<dyn UartConnection>, TransportError> {
        let addr: Address = address
            .parse()
            .map_err(|_| TransportError::InvalidAddress(address.to_owned()))?;

        let device = self.adapter.device(addr)?;
        if !device.is_connected().await? {
            device.connect().await?;
        }
        debug!("connected to {addr}");

        let (write_char, notify_char) = find_uart_characteristics(&device).await?;

        Ok(Box::new(BluerConnection {
            device,
            write_char,
            notify_char,
            forwarder: None,
        }))
    }
}

/// Locate the write and notify characteristics of the UART service.
///
/// Only the three fixed NUS UUIDs are consulted; no further service
/// discovery takes place.
async fn find_uart_characteristics(
    device: &Device,
) -> Result<(Characteristic, Characteristic), TransportError> {
    for service in device.services().await? {
        if service.uuid().await? != protocol::UART_SERVICE_UUID {
            continue;
        }

        let mut write_char = None;
        let mut notify_char = None;
        for characteristic in service.characteristics().await? {
            let uuid = characteristic.uuid().await?;
            if uuid == protocol::UART_WRITE_UUID {
                write_char = Some(characteristic);
            } else if uuid == protocol::UART_NOTIFY_UUID {
                notify_char = Some(characteristic);
            }
        }

        let write_char = write_char
            .ok_or(TransportError::CharacteristicNotFound(protocol::UART_WRITE_UUID))?;
        let notify_char = notify_char
            .ok_or(TransportError::CharacteristicNotFound(protocol::UART_NOTIFY_UUID))?;
        return Ok((write_char, notify_char));
    }

    Err(TransportError::ServiceNotFound(protocol::UART_SERVICE_UUID))
}

/// An open BlueZ GATT connection with its notification forwarder.
struct BluerConnection {
    device: Device,
    write_char: Characteristic,
    notify_char: Characteristic,
    forwarder: Option<JoinHandle<()>>,
}

#[async_trait]
impl UartConnection for BluerConnection {
    async fn subscribe(&mut self) -> Result<mpsc::UnboundedReceiver<Vec<u8>>, TransportError> {
        let stream = self
            .notify_char
            .notify()
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        // Forward the notify stream into a channel so the session loop
        // can select over it alongside user input. The forwarder only
        // moves frames; it never writes back to the device.
        let (tx, rx) = mpsc::unbounded_channel();
        self.forwarder = Some(tokio::spawn(async move {
            pin_mut!(stream);
            while let Some(frame) = stream.next().await {
                if tx.send(frame).is_err() {
                    break;
                }
            }
            debug!("notification stream ended");
        }));

        Ok(rx)
    }

    async fn write(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.write_char
            .write(payload)
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    async fn unsubscribe(&mut self) {
        // Aborting the forwarder drops the notify stream, which tells
        // BlueZ to stop notifications.
        if let Some(task) = self.forwarder.take() {
            task.abort();
            debug!("notification subscription stopped");
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.device.disconnect().await {
            warn!("disconnect failed: {e}");
        }
    }
}
