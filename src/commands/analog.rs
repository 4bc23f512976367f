//! Analog input monitor

use std::sync::Arc;

use wooting_keyboard::{AnalogInputEvent, AnalogInputHandler, Devices};

use super::CommandResult;

fn format_event(event: &AnalogInputEvent) -> String {
    if event.keys.is_empty() {
        return "No keys".to_string();
    }
    event
        .keys
        .iter()
        .map(|k| format!("{} ({}) = {:.2}", k.key.unwrap_or("?"), k.code, k.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print analog events from every analog device until Ctrl-C
pub async fn monitor(devices: &Devices) -> CommandResult {
    let mut count = 0;
    for device in devices.analog_devices() {
        let handler: AnalogInputHandler = Arc::new(|event: &AnalogInputEvent| {
            println!("{}", format_event(event));
        });
        device.set_on_input(Some(handler));
        println!("Listening on {}", device.printable_id());
        count += 1;
    }

    if count == 0 {
        println!("No analog devices found");
        return Ok(());
    }

    println!("Press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    for device in devices.analog_devices() {
        device.set_on_input(None);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wooting_keyboard::AnalogKey;
    use wooting_transport::HidDescriptor;

    fn event(keys: Vec<AnalogKey>) -> AnalogInputEvent {
        AnalogInputEvent {
            source: Arc::new(HidDescriptor {
                vendor_id: 0x31E3,
                product_id: 0x1302,
                product_name: None,
                usage_pages: vec![0xFF54],
                path: "test".into(),
            }),
            keys,
        }
    }

    #[test]
    fn test_format_event() {
        assert_eq!(format_event(&event(Vec::new())), "No keys");

        let keys = vec![
            AnalogKey {
                code: 0x1A,
                value: 1.0,
                key: Some("W"),
            },
            AnalogKey {
                code: 0x0102,
                value: 0.5,
                key: None,
            },
        ];
        assert_eq!(format_event(&event(keys)), "W (26) = 1.00, ? (258) = 0.50");
    }
}
