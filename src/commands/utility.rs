//! Utility commands: list, config

use std::path::Path;

use serde::Serialize;
use wooting_driver::DriverConfig;
use wooting_keyboard::{Device, Devices};
use wooting_transport::HidDescriptor;

use super::CommandResult;

#[derive(Serialize)]
struct ListEntry<'a> {
    kind: &'static str,
    model: &'static str,
    open: bool,
    descriptor: &'a HidDescriptor,
}

impl<'a> From<&'a Device> for ListEntry<'a> {
    fn from(device: &'a Device) -> Self {
        Self {
            kind: device.kind().name(),
            model: device.base().info().model,
            open: device.is_open(),
            descriptor: device.descriptor(),
        }
    }
}

/// Print every connected device
pub fn list(devices: &Devices, json: bool) -> CommandResult {
    if json {
        let entries: Vec<ListEntry> = devices.devices().iter().map(ListEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No devices found.");
        return Ok(());
    }

    devices.debug_dump();
    for device in devices.devices() {
        println!(
            "{:<8} {:<28} {}",
            device.kind(),
            device.base().info().model,
            device.printable_id()
        );
    }
    Ok(())
}

/// Print the effective configuration, optionally saving it
pub fn show_config(config: &DriverConfig, path: &Path, write: bool) -> CommandResult {
    print!("{}", toml::to_string_pretty(config)?);
    if write {
        config.save(path)?;
        println!("# Saved to {}", path.display());
    }
    Ok(())
}
