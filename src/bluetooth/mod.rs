//! Bluetooth Module
//!
//! UART-over-BLE access to a paired peripheral.
//!
//! ## Modules
//!
//! - [`protocol`] - NUS UUIDs and line handling rules
//! - [`resolver`] - paired-device registry query and alias selection
//! - [`transport`] - GATT transport seam and the BlueZ implementation
//! - [`session`] - interactive session controller

pub mod protocol;
pub mod resolver;
pub mod session;
pub mod transport;

pub use resolver::{find_by_alias, list_paired_devices, PairedDevice};
pub use session::run_interactive_session;
pub use transport::BluerTransport;
