//! Device layer for Wooting keyboards
//!
//! This crate classifies HID interfaces exposed by the transport layer into
//! RGB and analog devices, drives per-key lighting, and decodes analog key
//! travel reports.

pub mod analog;
pub mod color;
pub mod device;
pub mod devices;
pub mod error;
pub mod filter;
pub mod hid_codes;
pub mod keyboard_info;
pub mod packing;
pub mod protocol;
pub mod rgb;

pub use analog::{
    decode_analog_report, AnalogDevice, AnalogInputEvent, AnalogInputHandler, AnalogKey,
};
pub use color::{decode_rgb, encode_rgb, hex_to_rgb, Rgb};
pub use device::{CreateError, Device, DeviceBase, DeviceKind};
pub use devices::{Devices, DevicesOptions, ScanOptions};
pub use error::{Axis, KeyboardError};
pub use filter::{filter_match, match_any, FilterMismatch};
pub use keyboard_info::{DeviceType, KeyboardInfo, Layout};
pub use packing::{pack_position, unpack_position, MatrixPosition};
pub use rgb::RgbDevice;

// Re-export the transport types consumers need to build a registry
pub use wooting_transport::{DeviceFilter, HidBackend, HidDescriptor, HidHandle};
