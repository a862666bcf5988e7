//! Backend pricing config and client-side dashboard settings

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::errors::DashboardError;

/// Pricing config as served by `/config`
#[derive(Debug, Clone, Deserialize)]
pub struct PriceConfig {
    pub currency: String,
    pub grid_fee: f64,
    pub energy_tax: f64,
    pub variable_costs: f64,
    pub spot_fee: f64,
    pub cert_fee: f64,
    pub vat: f64,
    #[serde(default)]
    pub webui_toggle: bool,
}

/// Settings for the dashboard process itself, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub chart_path: PathBuf,
    pub chart_size: (u32, u32),
    pub price_interval: Duration,
    pub device_interval: Duration,
    pub health_interval: Duration,
    pub health_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8080".to_string(),
            chart_path: PathBuf::from("pricecontrol_chart.png"),
            chart_size: (1280, 480),
            price_interval: Duration::from_secs(120),
            device_interval: Duration::from_secs(5),
            health_interval: Duration::from_secs(3),
            health_timeout: Duration::from_millis(2000),
        }
    }
}

impl DashboardConfig {
    /// Read settings from the process environment (after `.env` is loaded)
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend_url = lookup("PRICECONTROL_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.backend_url);
        if backend_url.is_empty() {
            return Err(DashboardError::Config("PRICECONTROL_URL is empty".to_string()));
        }

        let chart_path = lookup("DASHBOARD_CHART_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.chart_path);

        let width = parse_number(&lookup, "DASHBOARD_CHART_WIDTH", defaults.chart_size.0 as u64)?;
        let height = parse_number(&lookup, "DASHBOARD_CHART_HEIGHT", defaults.chart_size.1 as u64)?;
        let chart_size = (
            to_u32("DASHBOARD_CHART_WIDTH", width)?,
            to_u32("DASHBOARD_CHART_HEIGHT", height)?,
        );

        let price_interval = Duration::from_secs(parse_number(
            &lookup,
            "DASHBOARD_PRICE_INTERVAL_SECS",
            defaults.price_interval.as_secs(),
        )?);
        let device_interval = Duration::from_secs(parse_number(
            &lookup,
            "DASHBOARD_DEVICE_INTERVAL_SECS",
            defaults.device_interval.as_secs(),
        )?);
        let health_interval = Duration::from_secs(parse_number(
            &lookup,
            "DASHBOARD_HEALTH_INTERVAL_SECS",
            defaults.health_interval.as_secs(),
        )?);
        let health_timeout = Duration::from_millis(parse_number(
            &lookup,
            "DASHBOARD_HEALTH_TIMEOUT_MS",
            defaults.health_timeout.as_millis() as u64,
        )?);

        Ok(Self {
            backend_url,
            chart_path,
            chart_size,
            price_interval,
            device_interval,
            health_interval,
            health_timeout,
        })
    }
}

fn parse_number<F>(lookup: &F, key: &str, default: u64) -> Result<u64, DashboardError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => {
            let value = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| DashboardError::Config(format!("{}='{}': {}", key, raw, e)))?;
            // tokio intervals panic on a zero period
            if value == 0 {
                return Err(DashboardError::Config(format!("{} must be greater than zero", key)));
            }
            Ok(value)
        }
    }
}

fn to_u32(key: &str, value: u64) -> Result<u32, DashboardError> {
    u32::try_from(value).map_err(|_| DashboardError::Config(format!("{} is too large", key)))
}
