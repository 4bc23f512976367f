//! In-memory transport for tests
//!
//! [`MockHandle`] records every report sent through it and can inject input
//! reports into the installed handler. [`MockBackend`] hands out a fixed set
//! of handles and counts enumeration rounds.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::TransportError;
use crate::types::{DeviceFilter, HidDescriptor};
use crate::{BoxedHandle, HidBackend, HidHandle, InputReportHandler};

/// A report captured by [`MockHandle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReport {
    pub report_id: u8,
    pub data: Vec<u8>,
}

/// Fake HID interface
pub struct MockHandle {
    descriptor: HidDescriptor,
    open: AtomicBool,
    fail_open: AtomicBool,
    open_calls: AtomicUsize,
    close_calls: AtomicUsize,
    feature_reports: Mutex<Vec<SentReport>>,
    reports: Mutex<Vec<SentReport>>,
    handler: Mutex<Option<InputReportHandler>>,
}

impl MockHandle {
    /// Closed handle for the given descriptor
    pub fn new(descriptor: HidDescriptor) -> Arc<Self> {
        Arc::new(Self {
            descriptor,
            open: AtomicBool::new(false),
            fail_open: AtomicBool::new(false),
            open_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
            feature_reports: Mutex::new(Vec::new()),
            reports: Mutex::new(Vec::new()),
            handler: Mutex::new(None),
        })
    }

    /// Convenience constructor
    pub fn with_ids(vendor_id: u16, product_id: u16, usage_pages: &[u16]) -> Arc<Self> {
        Self::new(HidDescriptor {
            vendor_id,
            product_id,
            product_name: Some(format!("Mock {product_id:04x}")),
            usage_pages: usage_pages.to_vec(),
            path: format!("mock:{vendor_id:04x}:{product_id:04x}:{usage_pages:04x?}"),
        })
    }

    /// Mark the handle open without counting an `open` call
    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }

    /// Make subsequent `open` calls fail
    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Feature reports sent so far
    pub fn feature_reports(&self) -> Vec<SentReport> {
        self.feature_reports.lock().clone()
    }

    /// Output reports sent so far
    pub fn reports(&self) -> Vec<SentReport> {
        self.reports.lock().clone()
    }

    /// Whether an input handler is installed
    pub fn has_input_handler(&self) -> bool {
        self.handler.lock().is_some()
    }

    /// Deliver an input report to the installed handler, if any
    pub fn inject_input(&self, data: &[u8]) {
        let current = self.handler.lock().clone();
        if let Some(handler) = current {
            handler(data);
        }
    }
}

#[async_trait]
impl HidHandle for MockHandle {
    fn descriptor(&self) -> &HidDescriptor {
        &self.descriptor
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn open(&self) -> Result<(), TransportError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(TransportError::HidPermissionDenied(self.descriptor.path.clone()));
        }
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn send_feature_report(
        &self,
        report_id: u8,
        data: &[u8],
    ) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        self.feature_reports.lock().push(SentReport {
            report_id,
            data: data.to_vec(),
        });
        Ok(())
    }

    async fn send_report(&self, report_id: u8, data: &[u8]) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        self.reports.lock().push(SentReport {
            report_id,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn set_input_report_handler(&self, handler: Option<InputReportHandler>) {
        *self.handler.lock() = handler;
    }
}

/// Fake enumeration
#[derive(Default)]
pub struct MockBackend {
    devices: Mutex<Vec<Arc<MockHandle>>>,
    request_calls: AtomicUsize,
    authorized_calls: AtomicUsize,
    fail_requests: AtomicBool,
}

impl MockBackend {
    pub fn new(devices: Vec<Arc<MockHandle>>) -> Arc<Self> {
        Arc::new(Self {
            devices: Mutex::new(devices),
            ..Default::default()
        })
    }

    /// Replace the device set returned by later enumerations
    pub fn set_devices(&self, devices: Vec<Arc<MockHandle>>) {
        *self.devices.lock() = devices;
    }

    /// Make `request_devices` fail
    pub fn set_fail_requests(&self, fail: bool) {
        self.fail_requests.store(fail, Ordering::SeqCst);
    }

    /// Number of `request_devices` rounds
    pub fn request_calls(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }

    /// Number of `authorized_devices` rounds
    pub fn authorized_calls(&self) -> usize {
        self.authorized_calls.load(Ordering::SeqCst)
    }

    fn handles(&self) -> Vec<BoxedHandle> {
        self.devices
            .lock()
            .iter()
            .map(|d| Arc::clone(d) as BoxedHandle)
            .collect()
    }
}

#[async_trait]
impl HidBackend for MockBackend {
    /// Returns every mock device regardless of filters, like a user picking
    /// all entries offered by a selection prompt.
    async fn request_devices(
        &self,
        _filters: &[DeviceFilter],
    ) -> Result<Vec<BoxedHandle>, TransportError> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(TransportError::Internal("request refused".into()));
        }
        Ok(self.handles())
    }

    async fn authorized_devices(&self) -> Result<Vec<BoxedHandle>, TransportError> {
        self.authorized_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.handles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_reports_only_when_open() {
        let handle = MockHandle::with_ids(0x31E3, 0x1302, &[0x1337]);
        assert!(matches!(
            handle.send_report(0, &[1, 2]).await,
            Err(TransportError::NotOpen)
        ));

        handle.open().await.unwrap();
        handle.send_feature_report(0, &[1, 2, 3]).await.unwrap();
        assert_eq!(
            handle.feature_reports(),
            vec![SentReport {
                report_id: 0,
                data: vec![1, 2, 3]
            }]
        );
        assert!(handle.reports().is_empty());
    }

    #[tokio::test]
    async fn test_counts_enumeration_rounds() {
        let backend = MockBackend::new(vec![MockHandle::with_ids(1, 2, &[3])]);
        assert_eq!(backend.request_devices(&[]).await.unwrap().len(), 1);
        backend.authorized_devices().await.unwrap();
        assert_eq!(backend.request_calls(), 1);
        assert_eq!(backend.authorized_calls(), 1);
    }
}
