//! Device registry behaviour against the in-memory transport

use std::sync::Arc;

use wooting_keyboard::protocol::{ANALOG_USAGE_PAGE, CFG_USAGE_PAGE, VENDOR_ID};
use wooting_keyboard::{DeviceKind, Devices, DevicesOptions, KeyboardError, ScanOptions};
use wooting_transport::mock::{MockBackend, MockHandle};
use wooting_transport::HidHandle;

fn rgb_handle(pid: u16) -> Arc<MockHandle> {
    MockHandle::with_ids(VENDOR_ID, pid, &[CFG_USAGE_PAGE])
}

fn analog_handle(pid: u16) -> Arc<MockHandle> {
    MockHandle::with_ids(VENDOR_ID, pid, &[ANALOG_USAGE_PAGE])
}

const BOTH: DevicesOptions = DevicesOptions {
    rgb: true,
    analog: true,
};

#[tokio::test]
async fn scan_claims_each_interface_for_its_capability() {
    let rgb = rgb_handle(0x1302);
    let analog = analog_handle(0x1302);
    let backend = MockBackend::new(vec![Arc::clone(&rgb), Arc::clone(&analog)]);
    let mut devices = Devices::new(backend.clone(), BOTH);

    let found = devices.scan(ScanOptions::default()).await.unwrap();
    let kinds: Vec<DeviceKind> = found.iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, vec![DeviceKind::Rgb, DeviceKind::Analog]);
    assert!(found.iter().all(|d| d.is_open()));

    assert_eq!(devices.rgb_devices().count(), 1);
    assert_eq!(devices.analog_devices().count(), 1);
    assert!(analog.has_input_handler());
    assert_eq!(rgb.open_calls(), 1);
    assert_eq!(analog.open_calls(), 1);
    // One request round per capability
    assert_eq!(backend.request_calls(), 2);
}

#[tokio::test]
async fn rgb_only_registry_ignores_analog_interfaces() {
    let backend = MockBackend::new(vec![rgb_handle(0x1200), analog_handle(0x1200)]);
    let mut devices = Devices::new(backend.clone(), DevicesOptions::default());

    assert_eq!(devices.kinds(), &[DeviceKind::Rgb]);
    let found = devices.scan(ScanOptions::default()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(devices.analog_devices().count(), 0);
    assert_eq!(devices.filters_combined().count(), 1);
}

#[tokio::test]
async fn second_scan_uses_the_connected_set() {
    let backend = MockBackend::new(vec![rgb_handle(0x1302)]);
    let mut devices = Devices::new(backend.clone(), DevicesOptions::default());

    devices.scan(ScanOptions::default()).await.unwrap();
    devices.scan(ScanOptions::default()).await.unwrap();
    assert_eq!(backend.request_calls(), 1);
    assert_eq!(devices.devices().len(), 1);
}

#[tokio::test]
async fn forced_scan_closes_previous_devices() {
    let first = rgb_handle(0x1302);
    let backend = MockBackend::new(vec![Arc::clone(&first)]);
    let mut devices = Devices::new(backend.clone(), DevicesOptions::default());
    devices.scan(ScanOptions::default()).await.unwrap();

    let second = rgb_handle(0x1402);
    backend.set_devices(vec![Arc::clone(&second)]);
    let found = devices.scan(ScanOptions::forced()).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].descriptor().product_id, 0x1402);
    assert!(!first.is_open());
    assert_eq!(first.close_calls(), 1);
    assert!(second.is_open());
    assert_eq!(backend.request_calls(), 2);
}

#[tokio::test]
async fn scan_without_auto_connect_tracks_nothing() {
    let handle = rgb_handle(0x1302);
    let backend = MockBackend::new(vec![Arc::clone(&handle)]);
    let mut devices = Devices::new(backend.clone(), DevicesOptions::default());

    let options = ScanOptions {
        force: false,
        auto_connect: false,
    };
    assert!(devices.scan(options).await.unwrap().is_empty());
    assert_eq!(handle.open_calls(), 0);
    assert_eq!(backend.request_calls(), 1);
}

#[tokio::test]
async fn failing_devices_are_skipped() {
    let refuses_open = rgb_handle(0x1302);
    refuses_open.set_fail_open(true);
    let unknown = rgb_handle(0x1100);
    let good = rgb_handle(0x1402);
    let backend = MockBackend::new(vec![refuses_open, unknown, Arc::clone(&good)]);
    let mut devices = Devices::new(backend, DevicesOptions::default());

    let found = devices.scan(ScanOptions::default()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].descriptor().product_id, 0x1402);
}

#[tokio::test]
async fn already_open_handles_are_not_reopened() {
    let handle = rgb_handle(0x1302);
    handle.set_open(true);
    let backend = MockBackend::new(vec![Arc::clone(&handle)]);
    let mut devices = Devices::new(backend, DevicesOptions::default());

    devices.scan(ScanOptions::default()).await.unwrap();
    assert_eq!(handle.open_calls(), 0);
    assert_eq!(devices.devices().len(), 1);
}

#[tokio::test]
async fn transport_request_failure_propagates() {
    let backend = MockBackend::new(vec![rgb_handle(0x1302)]);
    backend.set_fail_requests(true);
    let mut devices = Devices::new(backend, DevicesOptions::default());

    assert!(matches!(
        devices.scan(ScanOptions::default()).await,
        Err(KeyboardError::Transport(_))
    ));
}

#[tokio::test]
async fn initialise_runs_once() {
    let backend = MockBackend::new(vec![rgb_handle(0x1302), analog_handle(0x1302)]);
    let mut devices = Devices::new(backend.clone(), BOTH);

    assert!(!devices.is_initialised());
    devices.initialise().await.unwrap();
    devices.initialise().await.unwrap();

    assert!(devices.is_initialised());
    assert_eq!(backend.authorized_calls(), 1);
    assert_eq!(backend.request_calls(), 0);
    assert_eq!(devices.devices().len(), 2);

    // Connected set is reused by a plain scan
    devices.scan(ScanOptions::default()).await.unwrap();
    assert_eq!(backend.request_calls(), 0);
}

#[tokio::test]
async fn close_all_empties_the_set() {
    let handle = rgb_handle(0x1302);
    let backend = MockBackend::new(vec![Arc::clone(&handle)]);
    let mut devices = Devices::new(backend, DevicesOptions::default());
    devices.scan(ScanOptions::default()).await.unwrap();

    devices.close_all().await;
    assert!(devices.is_empty());
    assert!(!handle.is_open());
    devices.debug_dump();
}

#[tokio::test]
async fn rgb_views_can_drive_every_device() {
    let first = rgb_handle(0x1302);
    let second = rgb_handle(0x1402);
    let backend = MockBackend::new(vec![Arc::clone(&first), Arc::clone(&second)]);
    let mut devices = Devices::new(backend, DevicesOptions::default());
    devices.scan(ScanOptions::default()).await.unwrap();

    for rgb in devices.rgb_devices_mut() {
        rgb.fill(wooting_keyboard::Rgb::RED);
        rgb.flush_rgb_buffer(false).await.unwrap();
    }
    assert_eq!(first.reports().len(), 1);
    assert_eq!(second.reports().len(), 1);
}
