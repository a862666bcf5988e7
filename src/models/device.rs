//! Controllable device models

use serde::Deserialize;
use serde_json::Value;

/// Device list as served by `/devices`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Devices {
    #[serde(default)]
    pub device: Vec<Device>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub name: String,
    #[serde(default)]
    pub state: DeviceState,
    #[serde(default)]
    pub mode: DeviceMode,
    #[serde(default)]
    pub telldus: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub ratio: f64,
    #[serde(default)]
    pub today_trigger_price: TriggerPrice,
    #[serde(default)]
    pub tomorrow_trigger_price: TriggerPrice,
}

impl Device {
    pub fn threshold(&self) -> Threshold {
        Threshold {
            today: self.today_trigger_price,
            tomorrow: self.tomorrow_trigger_price,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DeviceState {
    On,
    Off,
    #[default]
    Unknown,
}

impl From<String> for DeviceState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "On" => DeviceState::On,
            "Off" => DeviceState::Off,
            _ => DeviceState::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DeviceMode {
    Price,
    Ratio,
    #[default]
    Unknown,
}

impl From<String> for DeviceMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Price" => DeviceMode::Price,
            "Ratio" => DeviceMode::Ratio,
            _ => DeviceMode::Unknown,
        }
    }
}

impl std::fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceMode::Price => write!(f, "Price"),
            DeviceMode::Ratio => write!(f, "Ratio"),
            DeviceMode::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Trigger price of one channel.
///
/// The backend sends these as numbers or as numbers-in-strings; anything that
/// does not parse to a finite number is `Unset` and never highlights a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum TriggerPrice {
    At(f64),
    #[default]
    Unset,
}

impl TriggerPrice {
    /// Strictly-below comparison; equal prices are not highlighted
    pub fn highlights(&self, value: f64) -> bool {
        matches!(self, TriggerPrice::At(limit) if value < *limit)
    }
}

impl From<Value> for TriggerPrice {
    fn from(value: Value) -> Self {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(p) if p.is_finite() => TriggerPrice::At(p),
            _ => TriggerPrice::Unset,
        }
    }
}

/// Per-device trigger prices for the today and tomorrow channels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Threshold {
    pub today: TriggerPrice,
    pub tomorrow: TriggerPrice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_device_list_parses() {
        let json = json!({
            "device": [
                {
                    "name": "Heater",
                    "state": "On",
                    "mode": "Price",
                    "telldus": true,
                    "price": 1.2,
                    "ratio": 0.3,
                    "today_trigger_price": "0.85",
                    "tomorrow_trigger_price": 0.9
                },
                {
                    "name": "Pump",
                    "state": "Testing",
                    "mode": "Schedule",
                    "price": 0.0,
                    "ratio": 0.0
                }
            ]
        });

        let devices: Devices = serde_json::from_value(json).unwrap();
        assert_eq!(devices.device.len(), 2);

        let heater = &devices.device[0];
        assert_eq!(heater.state, DeviceState::On);
        assert_eq!(heater.mode, DeviceMode::Price);
        assert_eq!(heater.threshold().today, TriggerPrice::At(0.85));
        assert_eq!(heater.threshold().tomorrow, TriggerPrice::At(0.9));

        let pump = &devices.device[1];
        assert_eq!(pump.state, DeviceState::Unknown);
        assert_eq!(pump.mode, DeviceMode::Unknown);
        assert_eq!(pump.threshold(), Threshold::default());
    }

    #[test]
    fn test_unparsable_trigger_is_unset() {
        assert_eq!(TriggerPrice::from(json!("n/a")), TriggerPrice::Unset);
        assert_eq!(TriggerPrice::from(json!(null)), TriggerPrice::Unset);
        assert_eq!(TriggerPrice::from(json!("NaN")), TriggerPrice::Unset);
    }

    #[test]
    fn test_highlights_is_strict() {
        let trigger = TriggerPrice::At(1.0);
        assert!(trigger.highlights(0.99));
        assert!(!trigger.highlights(1.0));
        assert!(!trigger.highlights(1.5));
        assert!(!TriggerPrice::Unset.highlights(-100.0));
    }
}
