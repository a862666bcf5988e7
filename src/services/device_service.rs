use crate::models::{Device, DeviceMode, DeviceState, TriggerPrice};
use crate::utils::Table;

/// One row of the device panel
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCard {
    pub name: String,
    pub state: &'static str,
    pub mode: String,
    pub telldus: String,
    pub price: String,
    pub ratio: String,
    pub triggers: String,
}

// Fields that do not drive the device in its current mode are struck out
fn struck(value: String, active: bool) -> String {
    if active {
        value
    } else {
        format!("~{}~", value)
    }
}

fn trigger_text(trigger: TriggerPrice) -> String {
    match trigger {
        TriggerPrice::At(p) => format!("{:.4}", p),
        TriggerPrice::Unset => "-".to_string(),
    }
}

impl DeviceCard {
    pub fn from_device(device: &Device) -> Self {
        let state = match device.state {
            DeviceState::On => "On",
            DeviceState::Off => "Off",
            DeviceState::Unknown => "Unknown",
        };

        let (telldus_active, price_active, ratio_active) = match device.mode {
            DeviceMode::Price => (true, true, false),
            DeviceMode::Ratio => (true, false, true),
            DeviceMode::Unknown => (false, false, false),
        };

        Self {
            name: device.name.clone(),
            state,
            mode: device.mode.to_string(),
            telldus: struck(device.telldus.to_string(), telldus_active),
            price: struck(device.price.to_string(), price_active),
            ratio: struck(device.ratio.to_string(), ratio_active),
            triggers: format!(
                "{} / {}",
                trigger_text(device.today_trigger_price),
                trigger_text(device.tomorrow_trigger_price)
            ),
        }
    }
}

/// Device panel as a text table; a switch hint column only when web UI switching is on
pub fn render_device_panel(devices: &[Device], webui_toggle: bool) -> String {
    let mut headers = vec!["Name", "State", "Mode", "Telldus", "Price", "Ratio", "Triggers"];
    if webui_toggle {
        headers.push("Switch");
    }

    let mut table = Table::new(&headers);
    for device in devices {
        let card = DeviceCard::from_device(device);
        let mut row = vec![
            card.name.clone(),
            card.state.to_string(),
            card.mode,
            card.telldus,
            card.price,
            card.ratio,
            card.triggers,
        ];
        if webui_toggle {
            row.push(format!("on {0} / off {0}", card.name));
        }
        table.add_row(row);
    }

    if table.is_empty() {
        return "No devices configured".to_string();
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Devices;
    use serde_json::json;

    fn devices() -> Vec<Device> {
        let devices: Devices = serde_json::from_value(json!({
            "device": [
                { "name": "Heater", "state": "On", "mode": "Price", "telldus": true,
                  "price": 1.5, "ratio": 0.25,
                  "today_trigger_price": "1.5", "tomorrow_trigger_price": "1.2" },
                { "name": "Boiler", "state": "Off", "mode": "Ratio", "telldus": false,
                  "price": 0.0, "ratio": 0.3,
                  "today_trigger_price": "0.7", "tomorrow_trigger_price": "" },
                { "name": "Pump", "state": "Testing", "mode": "Manual", "price": 0.0, "ratio": 0.0 }
            ]
        }))
        .unwrap();
        devices.device
    }

    #[test]
    fn test_inactive_fields_struck_per_mode() {
        let devices = devices();

        let heater = DeviceCard::from_device(&devices[0]);
        assert_eq!(heater.price, "1.5");
        assert_eq!(heater.ratio, "~0.25~");
        assert_eq!(heater.triggers, "1.5000 / 1.2000");

        let boiler = DeviceCard::from_device(&devices[1]);
        assert_eq!(boiler.price, "~0~");
        assert_eq!(boiler.ratio, "0.3");
        assert_eq!(boiler.triggers, "0.7000 / -");

        let pump = DeviceCard::from_device(&devices[2]);
        assert_eq!(pump.state, "Unknown");
        assert_eq!(pump.telldus, "~false~");
    }

    #[test]
    fn test_switch_column_follows_toggle() {
        let devices = devices();
        assert!(render_device_panel(&devices, true).contains("on Heater / off Heater"));
        assert!(!render_device_panel(&devices, false).contains("Switch"));
    }

    #[test]
    fn test_empty_panel() {
        assert_eq!(render_device_panel(&[], true), "No devices configured");
    }
}
