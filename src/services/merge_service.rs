use chrono::Duration;
use tracing::warn;

use crate::models::{MergedTimeline, Series};
use crate::services::slot_service::{label_of, SLOT_MINUTES};

/// Merge today's series with an optional tomorrow series into one timeline.
///
/// An empty tomorrow series is the same as none: the tomorrow channel is left
/// out entirely. Otherwise labels are today's followed by tomorrow's and each
/// channel is padded with `None` where the other one owns the slot. Gaps are
/// not filled; a slot missing from a series is missing from the labels.
pub fn merge(today: &Series, tomorrow: Option<&Series>) -> MergedTimeline {
    let today_labels = today.points().iter().map(|p| label_of(&p.slot_start));
    let today_values: Vec<Option<f64>> = today.points().iter().map(|p| Some(p.value)).collect();

    let tomorrow = match tomorrow {
        Some(series) if !series.is_empty() => series,
        _ => {
            return MergedTimeline {
                labels: today_labels.collect(),
                today_values,
                tomorrow_values: None,
            };
        }
    };

    warn_if_not_contiguous(today, tomorrow);

    let labels = today_labels
        .chain(tomorrow.points().iter().map(|p| label_of(&p.slot_start)))
        .collect();

    let mut padded_today = today_values;
    padded_today.resize(today.len() + tomorrow.len(), None);

    let tomorrow_values = std::iter::repeat(None)
        .take(today.len())
        .chain(tomorrow.points().iter().map(|p| Some(p.value)))
        .collect();

    MergedTimeline {
        labels,
        today_values: padded_today,
        tomorrow_values: Some(tomorrow_values),
    }
}

// Concatenation is positional; a hole between the days shifts the x axis silently
fn warn_if_not_contiguous(today: &Series, tomorrow: &Series) {
    if let (Some(last), Some(first)) = (today.last(), tomorrow.first()) {
        let expected = last.slot_start + Duration::minutes(SLOT_MINUTES as i64);
        if first.slot_start != expected {
            warn!(
                "Tomorrow starts at {} after today's last slot {}; bars concatenated without a gap",
                first.slot_start, last.slot_start
            );
        }
    }
}
