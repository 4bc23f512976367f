//! Device base, capability kinds and the command frame
//!
//! Every device wrapper owns one transport handle plus the capability
//! metadata resolved for it. [`DeviceKind`] is the closed set of capabilities;
//! each kind knows its filters and how to build its wrapper.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};
use wooting_transport::{BoxedHandle, DeviceFilter, HidDescriptor};

use crate::analog::AnalogDevice;
use crate::error::KeyboardError;
use crate::filter::{match_any, FilterMismatch};
use crate::keyboard_info::{self, KeyboardInfo};
use crate::packing::check_u8_range;
use crate::protocol::{
    ANALOG_USAGE_PAGE, CFG_USAGE_PAGE, FEATURE_FRAME_LEN, MAGIC, REPORT_ID, VENDOR_ID,
};
use crate::rgb::RgbDevice;

/// Filters claiming the RGB configuration interface
const RGB_FILTERS: &[DeviceFilter] = &[DeviceFilter::vendor_usage_page(VENDOR_ID, CFG_USAGE_PAGE)];

/// Filters claiming the analog report interface
const ANALOG_FILTERS: &[DeviceFilter] =
    &[DeviceFilter::vendor_usage_page(VENDOR_ID, ANALOG_USAGE_PAGE)];

/// Capability a device is claimed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Per-key RGB lighting
    Rgb,
    /// Analog key travel input
    Analog,
}

impl DeviceKind {
    /// All capability kinds
    pub const ALL: &'static [DeviceKind] = &[DeviceKind::Rgb, DeviceKind::Analog];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            DeviceKind::Rgb => "Rgb",
            DeviceKind::Analog => "Analog",
        }
    }

    /// Filters a descriptor must match to be claimed for this capability
    pub fn filters(&self) -> &'static [DeviceFilter] {
        match self {
            DeviceKind::Rgb => RGB_FILTERS,
            DeviceKind::Analog => ANALOG_FILTERS,
        }
    }

    /// Classify a handle and build the matching device wrapper
    ///
    /// The handle is not opened here.
    pub fn try_create(&self, handle: BoxedHandle) -> Result<Device, CreateError> {
        match_any(handle.descriptor(), self.filters()).map_err(CreateError::Unmatched)?;
        let device = match self {
            DeviceKind::Rgb => Device::Rgb(RgbDevice::new(handle, None)?),
            DeviceKind::Analog => Device::Analog(AnalogDevice::new(handle, None)?),
        };
        Ok(device)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why [`DeviceKind::try_create`] did not produce a device
#[derive(Error, Debug)]
pub enum CreateError {
    /// Not a device of this capability; carries the filter reasons
    #[error("No matching filter: {0}")]
    Unmatched(FilterMismatch),

    /// Matched, but the wrapper could not be built
    #[error(transparent)]
    Construction(#[from] KeyboardError),
}

/// State shared by every device kind
pub struct DeviceBase {
    handle: BoxedHandle,
    info: KeyboardInfo,
    kind: DeviceKind,
}

impl DeviceBase {
    /// Bind a handle to its capability metadata
    ///
    /// `info` overrides the lookup by masked product id. Fails if no
    /// metadata is found or the device predates protocol version 2.
    pub fn new(
        handle: BoxedHandle,
        kind: DeviceKind,
        info: Option<KeyboardInfo>,
    ) -> Result<Self, KeyboardError> {
        let info = match info {
            Some(info) => info,
            None => *keyboard_info::lookup(handle.descriptor().product_id).ok_or_else(|| {
                KeyboardError::UnknownProduct(handle.descriptor().debug_string())
            })?,
        };

        if info.small_packets {
            warn!(
                "{}: small packet transfers are not supported, raw colour reports may be rejected",
                info.model
            );
        }
        if !info.v2 {
            return Err(KeyboardError::UnsupportedProtocol(info.model.to_string()));
        }

        Ok(Self { handle, info, kind })
    }

    /// Build the 7-byte feature frame `D0 DA <cmd> <p1> <p2> <p3> <p4>`
    pub fn feature_frame(command_id: u8, params: [u8; 4]) -> [u8; FEATURE_FRAME_LEN] {
        let [p1, p2, p3, p4] = params;
        [MAGIC[0], MAGIC[1], command_id, p1, p2, p3, p4]
    }

    /// Send a feature command
    ///
    /// Every parameter must be in 0..=255; if any is not, nothing is sent.
    pub async fn send_feature(
        &self,
        command_id: u8,
        p1: i32,
        p2: i32,
        p3: i32,
        p4: i32,
    ) -> Result<(), KeyboardError> {
        if !self.is_open() {
            return Err(KeyboardError::NotOpen);
        }
        check_u8_range(&[p1, p2, p3, p4])?;

        // Range checked above
        let frame = Self::feature_frame(command_id, [p1 as u8, p2 as u8, p3 as u8, p4 as u8]);
        debug!("Sending command {}: {:02X?}", command_id, frame);
        self.handle.send_feature_report(REPORT_ID, &frame).await?;
        Ok(())
    }

    /// Close the transport handle; closing a closed device does nothing
    pub async fn close(&self) -> Result<(), KeyboardError> {
        if !self.handle.is_open() {
            return Ok(());
        }
        self.handle.close().await?;
        Ok(())
    }

    /// The underlying transport handle
    pub fn handle(&self) -> &BoxedHandle {
        &self.handle
    }

    pub fn descriptor(&self) -> &HidDescriptor {
        self.handle.descriptor()
    }

    /// Identity string for diagnostics
    pub fn printable_id(&self) -> String {
        self.descriptor().debug_string()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Resolved capability metadata
    pub fn info(&self) -> &KeyboardInfo {
        &self.info
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }
}

/// A live device of either capability
pub enum Device {
    Rgb(RgbDevice),
    Analog(AnalogDevice),
}

impl Device {
    pub fn base(&self) -> &DeviceBase {
        match self {
            Device::Rgb(d) => d.base(),
            Device::Analog(d) => d.base(),
        }
    }

    /// Capability tag, fixed at construction
    pub fn kind(&self) -> DeviceKind {
        self.base().kind()
    }

    pub fn descriptor(&self) -> &HidDescriptor {
        self.base().descriptor()
    }

    pub fn printable_id(&self) -> String {
        self.base().printable_id()
    }

    pub fn is_open(&self) -> bool {
        self.base().is_open()
    }

    pub async fn close(&self) -> Result<(), KeyboardError> {
        match self {
            Device::Rgb(d) => d.close().await,
            Device::Analog(d) => d.close().await,
        }
    }

    pub fn as_rgb(&self) -> Option<&RgbDevice> {
        match self {
            Device::Rgb(d) => Some(d),
            Device::Analog(_) => None,
        }
    }

    pub fn as_rgb_mut(&mut self) -> Option<&mut RgbDevice> {
        match self {
            Device::Rgb(d) => Some(d),
            Device::Analog(_) => None,
        }
    }

    pub fn as_analog(&self) -> Option<&AnalogDevice> {
        match self {
            Device::Analog(d) => Some(d),
            Device::Rgb(_) => None,
        }
    }

    pub fn as_analog_mut(&mut self) -> Option<&mut AnalogDevice> {
        match self {
            Device::Analog(d) => Some(d),
            Device::Rgb(_) => None,
        }
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("kind", &self.kind())
            .field("id", &self.printable_id())
            .field("open", &self.is_open())
            .finish()
    }
}
