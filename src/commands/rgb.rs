//! Lighting commands: demo, single, fill, reset

use std::time::Duration;

use tracing::info;
use wooting_keyboard::{Devices, MatrixPosition, Rgb, RgbDevice};

use super::CommandResult;
use wooting_driver::DemoConfig;

fn first_rgb(devices: &mut Devices) -> Option<&mut RgbDevice> {
    let device = devices.rgb_devices_mut().next();
    if device.is_none() {
        println!("No RGB devices found");
    }
    device
}

/// Colour keys by row, then by column, then reset
pub async fn demo(devices: &mut Devices, config: &DemoConfig) -> CommandResult {
    let Some(device) = first_rgb(devices) else {
        return Ok(());
    };
    info!("Demo buffered output: {}", device.printable_id());

    let by_row: Vec<MatrixPosition> = device.keys_by_row().collect();
    for pos in by_row {
        device.set_rgb(pos, config.colour(pos.row))?;
    }
    device.flush_rgb_buffer(false).await?;
    tokio::time::sleep(Duration::from_millis(config.step_ms)).await;

    let by_column: Vec<MatrixPosition> = device.keys_by_column().collect();
    for pos in by_column {
        device.set_rgb(pos, config.colour(pos.column))?;
    }
    device.flush_rgb_buffer(false).await?;
    tokio::time::sleep(Duration::from_millis(config.hold_ms)).await;

    device.reset_all().await?;
    Ok(())
}

/// Set one key directly, hold, then reset
pub async fn single(
    devices: &mut Devices,
    pos: MatrixPosition,
    colour: Rgb,
    hold: Duration,
) -> CommandResult {
    let Some(device) = first_rgb(devices) else {
        return Ok(());
    };
    info!(
        "Demo single output: {} pos: {}x{} colour: {}",
        device.printable_id(),
        pos.row,
        pos.column,
        colour
    );

    device.set_rgb_single(pos, colour).await?;
    tokio::time::sleep(hold).await;
    device.reset_all().await?;
    Ok(())
}

/// Paint every key of every RGB device
pub async fn fill(devices: &mut Devices, colour: Rgb) -> CommandResult {
    for device in devices.rgb_devices_mut() {
        device.fill(colour);
        device.flush_rgb_buffer(false).await?;
        println!("{}: {}", device.printable_id(), colour);
    }
    Ok(())
}

/// Reset every RGB device to its own lighting
pub async fn reset(devices: &Devices) -> CommandResult {
    for device in devices.rgb_devices() {
        device.reset_all().await?;
        println!("{}: reset", device.printable_id());
    }
    Ok(())
}
