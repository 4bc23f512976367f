//! Analog key travel input
//!
//! Input reports are a run of 3-byte records: big-endian key code, then one
//! travel byte. A zero code ends the run.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;
use wooting_transport::{BoxedHandle, HidDescriptor, InputReportHandler};

use crate::device::{DeviceBase, DeviceKind};
use crate::error::KeyboardError;
use crate::hid_codes::key_name;
use crate::keyboard_info::KeyboardInfo;

/// Bytes per analog record
const RECORD_LEN: usize = 3;

/// One key's travel
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogKey {
    /// HID usage code
    pub code: u16,
    /// Travel from 0.0 (released) to 1.0 (bottomed out)
    pub value: f32,
    /// Key name, if the code is known
    pub key: Option<&'static str>,
}

/// All keys reported by one input report
#[derive(Debug, Clone)]
pub struct AnalogInputEvent {
    /// Interface the report came from
    pub source: Arc<HidDescriptor>,
    /// Pressed keys; empty when everything is released
    pub keys: Vec<AnalogKey>,
}

/// Receives analog events on the thread that delivered the report
pub type AnalogInputHandler = Arc<dyn Fn(&AnalogInputEvent) + Send + Sync>;

/// Decode one analog input report
///
/// Stops at the first zero code, at the end of the buffer, or at a trailing
/// record too short to hold a value.
pub fn decode_analog_report(data: &[u8]) -> Vec<AnalogKey> {
    data.chunks_exact(RECORD_LEN)
        .map(|record| (u16::from_be_bytes([record[0], record[1]]), record[2]))
        .take_while(|(code, _)| *code != 0)
        .map(|(code, value)| AnalogKey {
            code,
            value: value as f32 / 255.0,
            key: key_name(code),
        })
        .collect()
}

/// Keyboard reporting analog key travel
pub struct AnalogDevice {
    base: DeviceBase,
    on_input: Arc<Mutex<Option<AnalogInputHandler>>>,
}

impl AnalogDevice {
    /// Create an analog device and start listening for input reports
    ///
    /// Metadata is looked up by product id unless `info` is given.
    pub fn new(handle: BoxedHandle, info: Option<KeyboardInfo>) -> Result<Self, KeyboardError> {
        let base = DeviceBase::new(handle, DeviceKind::Analog, info)?;
        let on_input: Arc<Mutex<Option<AnalogInputHandler>>> = Arc::new(Mutex::new(None));

        let source = Arc::new(base.descriptor().clone());
        let slot = Arc::clone(&on_input);
        let report_handler: InputReportHandler = Arc::new(move |data: &[u8]| {
            let keys = decode_analog_report(data);
            trace!("Analog report: {} keys", keys.len());
            // Clone out so a handler may replace itself
            let handler = slot.lock().clone();
            if let Some(handler) = handler {
                handler(&AnalogInputEvent {
                    source: Arc::clone(&source),
                    keys,
                });
            }
        });
        base.handle().set_input_report_handler(Some(report_handler));

        Ok(Self { base, on_input })
    }

    pub fn base(&self) -> &DeviceBase {
        &self.base
    }

    pub fn printable_id(&self) -> String {
        self.base.printable_id()
    }

    pub fn info(&self) -> &KeyboardInfo {
        self.base.info()
    }

    pub fn is_open(&self) -> bool {
        self.base.is_open()
    }

    /// Install the input handler, replacing any previous one; `None` clears it
    pub fn set_on_input(&self, handler: Option<AnalogInputHandler>) {
        *self.on_input.lock() = handler;
    }

    /// Whether an input handler is installed
    pub fn has_on_input(&self) -> bool {
        self.on_input.lock().is_some()
    }

    /// Stop listening and close the device
    pub async fn close(&self) -> Result<(), KeyboardError> {
        self.base.handle().set_input_report_handler(None);
        self.base.close().await
    }
}
