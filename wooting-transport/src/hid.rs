//! hidapi-backed transport
//!
//! Every HID interface path becomes one [`HidApiHandle`]. Native hidapi has no
//! permission prompt, so `request_devices` simply pre-selects by filter.

use std::collections::BTreeMap;
use std::ffi::CString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use hidapi::{HidApi, HidDevice};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::types::{DeviceFilter, HidDescriptor};
use crate::{BoxedHandle, HidBackend, HidHandle, InputReportHandler};

/// Largest input report read in one call
const INPUT_REPORT_SIZE: usize = 256;

/// Read timeout; only bounds how quickly the reader notices shutdown
const READ_TIMEOUT_MS: i32 = 10;

/// Back-off after a failed read
const ERROR_SLEEP_MS: u64 = 100;

/// Enumerates HID interfaces through hidapi
#[derive(Debug, Default)]
pub struct HidApiBackend {
    /// Only list interfaces of this vendor (all vendors if `None`)
    vendor_id: Option<u16>,
}

impl HidApiBackend {
    /// Backend listing every HID interface on the system
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend listing only interfaces of one vendor
    pub fn for_vendor(vendor_id: u16) -> Self {
        Self {
            vendor_id: Some(vendor_id),
        }
    }

    /// Enumerate interfaces, merging entries that share a path
    ///
    /// Some platforms report one entry per top-level collection, so the same
    /// path can show up several times with different usage pages.
    fn enumerate(&self) -> Result<Vec<(CString, HidDescriptor)>, TransportError> {
        let api = HidApi::new()?;
        let mut by_path: BTreeMap<CString, HidDescriptor> = BTreeMap::new();

        for device_info in api.device_list() {
            let vid = device_info.vendor_id();
            if self.vendor_id.is_some_and(|v| v != vid) {
                continue;
            }

            let path = device_info.path().to_owned();
            let usage_page = device_info.usage_page();
            let entry = by_path.entry(path).or_insert_with_key(|path| HidDescriptor {
                vendor_id: vid,
                product_id: device_info.product_id(),
                product_name: device_info.product_string().map(|s| s.to_string()),
                usage_pages: Vec::new(),
                path: path.to_string_lossy().to_string(),
            });
            if !entry.usage_pages.contains(&usage_page) {
                entry.usage_pages.push(usage_page);
            }
        }

        debug!("Enumerated {} HID interfaces", by_path.len());
        Ok(by_path.into_iter().collect())
    }

    fn into_handles(devices: Vec<(CString, HidDescriptor)>) -> Vec<BoxedHandle> {
        devices
            .into_iter()
            .map(|(path, descriptor)| Arc::new(HidApiHandle::new(path, descriptor)) as BoxedHandle)
            .collect()
    }
}

#[async_trait]
impl HidBackend for HidApiBackend {
    async fn request_devices(
        &self,
        filters: &[DeviceFilter],
    ) -> Result<Vec<BoxedHandle>, TransportError> {
        let devices: Vec<_> = self
            .enumerate()?
            .into_iter()
            .filter(|(_, d)| filters.iter().any(|f| f.admits(d)))
            .collect();
        info!("Found {} devices matching filters", devices.len());
        Ok(Self::into_handles(devices))
    }

    async fn authorized_devices(&self) -> Result<Vec<BoxedHandle>, TransportError> {
        Ok(Self::into_handles(self.enumerate()?))
    }
}

/// Resources held while a handle is open
struct OpenState {
    device: HidDevice,
    shutdown: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

/// One hidapi interface
pub struct HidApiHandle {
    path: CString,
    descriptor: HidDescriptor,
    state: Mutex<Option<OpenState>>,
    handler: Arc<Mutex<Option<InputReportHandler>>>,
}

impl HidApiHandle {
    fn new(path: CString, descriptor: HidDescriptor) -> Self {
        Self {
            path,
            descriptor,
            state: Mutex::new(None),
            handler: Arc::new(Mutex::new(None)),
        }
    }

    /// Prepend the report id as hidapi expects
    fn with_report_id(report_id: u8, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(data.len() + 1);
        buf.push(report_id);
        buf.extend_from_slice(data);
        buf
    }

    fn spawn_reader(
        &self,
        input: HidDevice,
        shutdown: Arc<AtomicBool>,
    ) -> Result<JoinHandle<()>, TransportError> {
        let handler = Arc::clone(&self.handler);
        std::thread::Builder::new()
            .name("hid-input-reader".into())
            .spawn(move || run_input_reader_loop(input, handler, shutdown))
            .map_err(|e| TransportError::Internal(format!("Failed to spawn reader: {e}")))
    }
}

#[async_trait]
impl HidHandle for HidApiHandle {
    fn descriptor(&self) -> &HidDescriptor {
        &self.descriptor
    }

    fn is_open(&self) -> bool {
        self.state.lock().is_some()
    }

    async fn open(&self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.is_some() {
            return Ok(());
        }

        let api = HidApi::new()?;
        let device = api.open_path(&self.path)?;

        // Second handle on the same path so input can be read without
        // holding the command handle
        let shutdown = Arc::new(AtomicBool::new(false));
        let reader = match api.open_path(&self.path) {
            Ok(input) => Some(self.spawn_reader(input, Arc::clone(&shutdown))?),
            Err(e) => {
                debug!("No input reader for {}: {}", self.descriptor.path, e);
                None
            }
        };

        info!("Opened {}", self.descriptor.debug_string());
        *state = Some(OpenState {
            device,
            shutdown,
            reader,
        });
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        let Some(open) = self.state.lock().take() else {
            return Ok(());
        };
        open.shutdown.store(true, Ordering::Relaxed);
        drop(open.device);
        if let Some(reader) = open.reader {
            if reader.join().is_err() {
                warn!("Input reader for {} panicked", self.descriptor.path);
            }
        }
        info!("Closed {}", self.descriptor.debug_string());
        Ok(())
    }

    async fn send_feature_report(
        &self,
        report_id: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        let state = self.state.lock();
        let open = state.as_ref().ok_or(TransportError::NotOpen)?;
        let buf = Self::with_report_id(report_id, data);
        debug!("Feature report {}: {:02X?}", report_id, &buf[..buf.len().min(16)]);
        open.device.send_feature_report(&buf)?;
        Ok(())
    }

    async fn send_report(&self, report_id: u8, data: &[u8]) -> Result<(), TransportError> {
        let state = self.state.lock();
        let open = state.as_ref().ok_or(TransportError::NotOpen)?;
        let buf = Self::with_report_id(report_id, data);
        debug!("Output report {}: {} bytes", report_id, buf.len());
        open.device.write(&buf)?;
        Ok(())
    }

    fn set_input_report_handler(&self, handler: Option<InputReportHandler>) {
        *self.handler.lock() = handler;
    }
}

impl Drop for HidApiHandle {
    fn drop(&mut self) {
        if let Some(open) = self.state.get_mut().as_ref() {
            open.shutdown.store(true, Ordering::Relaxed);
        }
    }
}

/// Read input reports until `shutdown` is set, handing each to the handler
fn run_input_reader_loop(
    input: HidDevice,
    handler: Arc<Mutex<Option<InputReportHandler>>>,
    shutdown: Arc<AtomicBool>,
) {
    debug!("Input reader thread started");
    let mut buf = [0u8; INPUT_REPORT_SIZE];

    while !shutdown.load(Ordering::Relaxed) {
        match input.read_timeout(&mut buf, READ_TIMEOUT_MS) {
            Ok(len) if len > 0 => {
                // Clone out so the handler runs without the slot locked
                let current = handler.lock().clone();
                if let Some(callback) = current {
                    callback(&buf[..len]);
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Input reader error: {}", e);
                std::thread::sleep(Duration::from_millis(ERROR_SLEEP_MS));
            }
        }
    }

    debug!("Input reader thread exiting");
}
