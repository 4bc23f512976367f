//! Command handlers for the CLI application.
//!
//! - `utility`: device listing
//! - `rgb`: lighting commands (demo, single, fill, reset)
//! - `analog`: analog input monitor

pub mod analog;
pub mod rgb;
pub mod utility;

use std::sync::Arc;

use tracing::debug;
use wooting_keyboard::protocol::VENDOR_ID;
use wooting_keyboard::{Devices, DevicesOptions, ScanOptions};
use wooting_transport::HidApiBackend;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Reconnect accessible devices, then scan for the enabled capabilities
pub async fn connect(options: DevicesOptions) -> anyhow::Result<Devices> {
    let backend = Arc::new(HidApiBackend::for_vendor(VENDOR_ID));
    let mut devices = Devices::new(backend, options);
    devices.initialise().await?;
    devices.scan(ScanOptions::default()).await?;
    debug!("{} devices connected", devices.devices().len());
    Ok(devices)
}
