//! Chart generation models

use super::color::{ChannelColors, ColorSequence, SlotColor};
use super::timeline::{MergedTimeline, SlotLabel};

/// One bar series drawn over the shared label axis
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub colors: ColorSequence,
    /// Swatch used in the legend
    pub legend: SlotColor,
}

/// Everything a chart surface needs to draw the price bars
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<SlotLabel>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Today dataset first; the tomorrow dataset only when the timeline has that channel
    pub fn new(currency: &str, timeline: &MergedTimeline, colors: &ChannelColors) -> Self {
        let mut datasets = vec![Dataset {
            label: format!("{} (Today)", currency),
            values: timeline.today_values.clone(),
            colors: colors.today.clone(),
            legend: SlotColor::DefaultToday,
        }];

        if let Some(tomorrow) = &timeline.tomorrow_values {
            datasets.push(Dataset {
                label: format!("{} (Tomorrow)", currency),
                values: tomorrow.clone(),
                colors: colors
                    .tomorrow
                    .clone()
                    .unwrap_or_else(|| vec![SlotColor::DefaultTomorrow; tomorrow.len()]),
                legend: SlotColor::DefaultTomorrow,
            });
        }

        Self {
            title: format!("Spot price ({})", currency),
            labels: timeline.labels.clone(),
            datasets,
        }
    }

    /// Swap in new colors without touching labels or values
    pub fn apply_colors(&mut self, colors: &ChannelColors) {
        if let Some(today) = self.datasets.get_mut(0) {
            today.colors = colors.today.clone();
        }
        if let (Some(dataset), Some(tomorrow)) = (self.datasets.get_mut(1), &colors.tomorrow) {
            dataset.colors = tomorrow.clone();
        }
    }

    /// Lowest and highest defined value across all datasets
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter().flatten().copied())
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline() -> MergedTimeline {
        MergedTimeline {
            labels: vec![SlotLabel::from_parts(23, 45), SlotLabel::from_parts(0, 0)],
            today_values: vec![Some(0.4), None],
            tomorrow_values: Some(vec![None, Some(-0.1)]),
        }
    }

    #[test]
    fn test_tomorrow_dataset_follows_channel() {
        let colors = ChannelColors {
            today: vec![SlotColor::Current, SlotColor::DefaultToday],
            tomorrow: Some(vec![SlotColor::DefaultTomorrow; 2]),
        };
        let data = ChartData::new("EUR_per_kWh", &timeline(), &colors);
        assert_eq!(data.datasets.len(), 2);
        assert_eq!(data.datasets[1].label, "EUR_per_kWh (Tomorrow)");

        let mut single = timeline();
        single.tomorrow_values = None;
        let colors = ChannelColors {
            today: colors.today,
            tomorrow: None,
        };
        assert_eq!(ChartData::new("EUR_per_kWh", &single, &colors).datasets.len(), 1);
    }

    #[test]
    fn test_value_range_skips_absent() {
        let colors = ChannelColors {
            today: vec![SlotColor::DefaultToday; 2],
            tomorrow: None,
        };
        let data = ChartData::new("SEK_per_kWh", &timeline(), &colors);
        assert_eq!(data.value_range(), Some((-0.1, 0.4)));
    }

    #[test]
    fn test_apply_colors_replaces_both_channels() {
        let base = ChannelColors {
            today: vec![SlotColor::DefaultToday; 2],
            tomorrow: Some(vec![SlotColor::DefaultTomorrow; 2]),
        };
        let mut data = ChartData::new("SEK_per_kWh", &timeline(), &base);
        let next = ChannelColors {
            today: vec![SlotColor::BelowThreshold, SlotColor::DefaultToday],
            tomorrow: Some(vec![SlotColor::DefaultTomorrow, SlotColor::BelowThreshold]),
        };
        data.apply_colors(&next);
        assert_eq!(data.datasets[0].colors, next.today);
        assert_eq!(Some(data.datasets[1].colors.clone()), next.tomorrow);
    }
}
