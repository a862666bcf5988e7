//! Spot price models

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tracing::warn;

use crate::utils::errors::DashboardError;

/// One 15-minute slot price
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub slot_start: DateTime<FixedOffset>,
    pub value: f64,
}

/// Chronologically ordered prices for one day, no duplicate slot starts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<PricePoint>,
}

impl Series {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.slot_start);
        points.dedup_by_key(|p| p.slot_start);
        Self { points }
    }

    /// Parse a backend price array: `[{ "time_start": "<rfc3339>", "<currency>": 1.23 }, ...]`
    ///
    /// A body that is not an array is an error. Entries without a usable
    /// timestamp or price are skipped with a warning and the rest are kept.
    pub fn from_json(json: &Value, currency: &str) -> Result<Self, DashboardError> {
        let array = json.as_array().ok_or_else(|| {
            DashboardError::MalformedSeries(format!("expected array at root, got: {}", json))
        })?;

        let mut points = Vec::with_capacity(array.len());
        for (i, item) in array.iter().enumerate() {
            match parse_point(item, currency) {
                Ok(point) => points.push(point),
                Err(e) => warn!("Skipping price entry {}: {}", i, e),
            }
        }

        Ok(Self::new(points))
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

fn parse_point(item: &Value, currency: &str) -> Result<PricePoint, String> {
    let start = item
        .get("time_start")
        .and_then(Value::as_str)
        .ok_or_else(|| "no time_start".to_string())?;

    let slot_start = DateTime::parse_from_rfc3339(start)
        .map_err(|e| format!("invalid time_start '{}': {}", start, e))?;

    let value = item
        .get(currency)
        .and_then(Value::as_f64)
        .ok_or_else(|| format!("no numeric '{}' price", currency))?;

    Ok(PricePoint { slot_start, value })
}
