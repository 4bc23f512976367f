//! Transport abstraction layer for Wooting keyboard communication
//!
//! This crate describes the HID collaborator the keyboard layer talks to:
//!
//! - [`HidBackend`] enumerates devices (with or without a selection step)
//! - [`HidHandle`] is one HID interface: open/close, feature and output
//!   reports, and input report delivery
//!
//! A backend built on `hidapi` is always available. An in-memory backend for
//! tests is behind the `mock` feature.

pub mod error;
pub mod types;

mod hid;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::TransportError;
pub use hid::{HidApiBackend, HidApiHandle};
pub use types::{masked_product_id, DeviceFilter, HidDescriptor, PRODUCT_ID_MASK};

use async_trait::async_trait;
use std::sync::Arc;

/// Callback invoked with the payload of every input report
///
/// Called on whatever thread the backend delivers reports on.
pub type InputReportHandler = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// One HID interface
#[async_trait]
pub trait HidHandle: Send + Sync {
    /// Identification of the interface
    fn descriptor(&self) -> &HidDescriptor;

    /// Whether the handle is currently open
    fn is_open(&self) -> bool;

    /// Open the handle
    async fn open(&self) -> Result<(), TransportError>;

    /// Close the handle
    async fn close(&self) -> Result<(), TransportError>;

    /// Send a feature report
    ///
    /// # Arguments
    /// * `report_id` - HID report id (0 for devices without numbered reports)
    /// * `data` - Report payload, without the report id
    async fn send_feature_report(&self, report_id: u8, data: &[u8])
        -> Result<(), TransportError>;

    /// Send an output report
    ///
    /// # Arguments
    /// * `report_id` - HID report id (0 for devices without numbered reports)
    /// * `data` - Report payload, without the report id
    async fn send_report(&self, report_id: u8, data: &[u8]) -> Result<(), TransportError>;

    /// Install or clear the input report callback
    ///
    /// At most one handler is installed; installing replaces the previous one.
    fn set_input_report_handler(&self, handler: Option<InputReportHandler>);
}

/// Type alias for a shared handle
pub type BoxedHandle = Arc<dyn HidHandle>;

/// Device enumeration
#[async_trait]
pub trait HidBackend: Send + Sync {
    /// Ask for devices matching any of `filters`
    ///
    /// Backends with a user-facing selection step present it here.
    async fn request_devices(
        &self,
        filters: &[DeviceFilter],
    ) -> Result<Vec<BoxedHandle>, TransportError>;

    /// Devices already accessible without any selection step
    async fn authorized_devices(&self) -> Result<Vec<BoxedHandle>, TransportError>;
}
