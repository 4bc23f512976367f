//! Device registry - discovery, classification and the live device set
//!
//! ```no_run
//! # async fn run() -> Result<(), wooting_keyboard::KeyboardError> {
//! use std::sync::Arc;
//! use wooting_keyboard::{Devices, DevicesOptions, ScanOptions};
//! use wooting_transport::HidApiBackend;
//!
//! let mut devices = Devices::new(Arc::new(HidApiBackend::new()), DevicesOptions::default());
//! devices.initialise().await?;
//! devices.scan(ScanOptions::default()).await?;
//! for rgb in devices.rgb_devices() {
//!     rgb.reset_all().await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wooting_transport::{BoxedHandle, DeviceFilter, HidBackend};

use crate::analog::AnalogDevice;
use crate::device::{CreateError, Device, DeviceKind};
use crate::error::KeyboardError;
use crate::rgb::RgbDevice;

/// Which capabilities the registry looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicesOptions {
    /// Claim RGB lighting interfaces
    pub rgb: bool,
    /// Claim analog input interfaces
    pub analog: bool,
}

impl Default for DevicesOptions {
    fn default() -> Self {
        Self {
            rgb: true,
            analog: false,
        }
    }
}

impl DevicesOptions {
    /// Enabled capability kinds, RGB first
    pub fn kinds(&self) -> Vec<DeviceKind> {
        let mut kinds = Vec::new();
        if self.rgb {
            kinds.push(DeviceKind::Rgb);
        }
        if self.analog {
            kinds.push(DeviceKind::Analog);
        }
        kinds
    }
}

/// Options for [`Devices::scan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Rescan even if devices are already connected
    pub force: bool,
    /// Classify and open what the transport returns
    pub auto_connect: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            force: false,
            auto_connect: true,
        }
    }
}

impl ScanOptions {
    /// Default options with `force` set
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }
}

/// Live set of Wooting devices
pub struct Devices {
    backend: Arc<dyn HidBackend>,
    devices: Vec<Device>,
    kinds: Vec<DeviceKind>,
    initialised: bool,
}

impl Devices {
    /// Create a registry for the capabilities enabled in `options`
    pub fn new(backend: Arc<dyn HidBackend>, options: DevicesOptions) -> Self {
        Self {
            backend,
            devices: Vec::new(),
            kinds: options.kinds(),
            initialised: false,
        }
    }

    /// Enabled capability kinds
    pub fn kinds(&self) -> &[DeviceKind] {
        &self.kinds
    }

    /// Discover and connect devices
    ///
    /// Returns the current set without touching the transport if devices are
    /// already connected and `force` is not set. Otherwise every tracked
    /// device is closed first.
    pub async fn scan(&mut self, options: ScanOptions) -> Result<&[Device], KeyboardError> {
        if !self.devices.is_empty() && !options.force {
            return Ok(&self.devices);
        }

        self.close_all().await;

        for kind in self.kinds.clone() {
            let found = self.backend.request_devices(kind.filters()).await?;
            debug!("{} request returned {} devices", kind, found.len());
            if options.auto_connect {
                self.connect_devices(found, kind).await;
            }
        }

        Ok(&self.devices)
    }

    /// Reconnect to devices that are already accessible, without prompting
    ///
    /// Runs once; later calls return immediately. Devices already tracked are
    /// kept.
    pub async fn initialise(&mut self) -> Result<(), KeyboardError> {
        if self.initialised {
            return Ok(());
        }

        let found = self.backend.authorized_devices().await?;
        for kind in self.kinds.clone() {
            self.connect_devices(found.clone(), kind).await;
        }
        self.initialised = true;
        Ok(())
    }

    /// Whether [`initialise`](Self::initialise) has completed
    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Try each handle as `kind`; failures are logged and skipped
    async fn connect_devices(&mut self, handles: Vec<BoxedHandle>, kind: DeviceKind) -> usize {
        let mut connected = 0;

        for handle in handles {
            let path = handle.descriptor().path.clone();
            if self
                .devices
                .iter()
                .any(|d| d.kind() == kind && d.descriptor().path == path)
            {
                debug!("{} already connected as {}", path, kind);
                continue;
            }

            let device = match kind.try_create(handle) {
                Ok(device) => device,
                Err(CreateError::Unmatched(reasons)) => {
                    debug!("Not a {} device ({}): {}", kind, path, reasons);
                    continue;
                }
                Err(CreateError::Construction(e)) => {
                    warn!("Skipping {} device {}: {}", kind, path, e);
                    continue;
                }
            };

            if !device.is_open() {
                if let Err(e) = device.base().handle().open().await {
                    warn!("Failed to open {}: {}", device.printable_id(), e);
                    // Drop the analog input registration again
                    let _ = device.close().await;
                    continue;
                }
            }

            info!("Connected {} device {}", kind, device.printable_id());
            self.devices.push(device);
            connected += 1;
        }

        connected
    }

    /// Close every device and forget them
    ///
    /// Close failures are logged; the set is emptied regardless.
    pub async fn close_all(&mut self) {
        for device in self.devices.drain(..) {
            if let Err(e) = device.close().await {
                warn!("Failed to close {}: {}", device.printable_id(), e);
            }
        }
    }

    /// Filters of every enabled capability, in capability order
    pub fn filters_combined(&self) -> impl Iterator<Item = &'static DeviceFilter> + '_ {
        self.kinds.iter().flat_map(|k| k.filters().iter())
    }

    /// All live devices
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Live RGB devices
    pub fn rgb_devices(&self) -> impl Iterator<Item = &RgbDevice> {
        self.devices.iter().filter_map(Device::as_rgb)
    }

    pub fn rgb_devices_mut(&mut self) -> impl Iterator<Item = &mut RgbDevice> {
        self.devices.iter_mut().filter_map(Device::as_rgb_mut)
    }

    /// Live analog devices
    pub fn analog_devices(&self) -> impl Iterator<Item = &AnalogDevice> {
        self.devices.iter().filter_map(Device::as_analog)
    }

    pub fn analog_devices_mut(&mut self) -> impl Iterator<Item = &mut AnalogDevice> {
        self.devices.iter_mut().filter_map(Device::as_analog_mut)
    }

    /// Log kind and identity of every live device
    pub fn debug_dump(&self) {
        for device in &self.devices {
            info!("{}\t{}", device.kind(), device.printable_id());
        }
    }
}
