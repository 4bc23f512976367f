//! Integration tests against real keyboards.
//!
//! These tests require a Wooting keyboard to be connected.
//! Run with: cargo test -p wooting-keyboard --test hardware -- --ignored --nocapture

use std::sync::Arc;
use std::time::Duration;

use wooting_keyboard::protocol::VENDOR_ID;
use wooting_keyboard::{
    AnalogInputEvent, AnalogInputHandler, Devices, DevicesOptions, MatrixPosition, Rgb,
    ScanOptions,
};
use wooting_transport::HidApiBackend;

async fn scan(options: DevicesOptions) -> Devices {
    let mut devices = Devices::new(Arc::new(HidApiBackend::for_vendor(VENDOR_ID)), options);
    devices
        .scan(ScanOptions::default())
        .await
        .expect("HID enumeration failed");
    assert!(!devices.is_empty(), "No keyboard found, plug in a Wooting");
    devices
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // requires hardware
async fn single_key_then_reset() {
    let devices = scan(DevicesOptions::default()).await;

    for rgb in devices.rgb_devices() {
        println!("{}", rgb.printable_id());
        rgb.set_rgb_single(MatrixPosition::new(0, 0), Rgb::RED)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        rgb.reset_all().await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // requires hardware
async fn analog_reports_arrive() {
    let devices = scan(DevicesOptions {
        rgb: false,
        analog: true,
    })
    .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for analog in devices.analog_devices() {
        let tx = tx.clone();
        let handler: AnalogInputHandler = Arc::new(move |event: &AnalogInputEvent| {
            let _ = tx.send(event.keys.len());
        });
        analog.set_on_input(Some(handler));
    }

    println!("Press any key within 10 seconds");
    let keys = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("no analog report within timeout");
    println!("First report carried {keys:?} keys");
}
