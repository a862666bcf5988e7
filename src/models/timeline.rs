//! Merged today/tomorrow timeline models

use std::fmt;

/// Zero-padded `HH:MM` slot label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotLabel(String);

impl SlotLabel {
    /// Build a label from an hour and an already slot-aligned minute
    pub fn from_parts(hour: u32, minute: u32) -> Self {
        SlotLabel(format!("{:02}:{:02}", hour, minute))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Labels plus the today and tomorrow value channels aligned to them.
///
/// `today_values` is defined exactly at the positions taken from the today
/// series and `tomorrow_values`, when present, exactly at the positions taken
/// from the tomorrow series. The two channels never both hold a value at the
/// same index. `tomorrow_values` is `None` when no tomorrow data exists at all,
/// which is a different thing from a channel of all-absent entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTimeline {
    pub labels: Vec<SlotLabel>,
    pub today_values: Vec<Option<f64>>,
    pub tomorrow_values: Option<Vec<Option<f64>>>,
}

impl MergedTimeline {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn has_tomorrow(&self) -> bool {
        self.tomorrow_values.is_some()
    }

    /// First index carrying `label`
    pub fn position(&self, label: &SlotLabel) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}
