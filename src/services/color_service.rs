use crate::models::{ChannelColors, MergedTimeline, SlotColor, SlotLabel, Threshold};

/// Default coloring: the today bar at `current` is marked, everything else is plain.
///
/// Only positions owned by the today channel can be current; a tomorrow slot
/// with the same `HH:MM` never is.
pub fn baseline(timeline: &MergedTimeline, current: &SlotLabel) -> ChannelColors {
    let today = timeline
        .labels
        .iter()
        .zip(&timeline.today_values)
        .map(|(label, value)| {
            if value.is_some() && label == current {
                SlotColor::Current
            } else {
                SlotColor::DefaultToday
            }
        })
        .collect();

    let tomorrow = timeline
        .tomorrow_values
        .as_ref()
        .map(|values| vec![SlotColor::DefaultTomorrow; values.len()]);

    ChannelColors { today, tomorrow }
}

/// Coloring while a device card is hovered.
///
/// Bars strictly below the device's trigger price turn `BelowThreshold`. A bar
/// that is `Current` in `baseline` stays `Current` whatever its price.
pub fn highlighted(
    timeline: &MergedTimeline,
    baseline: &ChannelColors,
    threshold: &Threshold,
) -> ChannelColors {
    let today = timeline
        .today_values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            if baseline.today.get(i) == Some(&SlotColor::Current) {
                return SlotColor::Current;
            }
            match value {
                Some(v) if threshold.today.highlights(*v) => SlotColor::BelowThreshold,
                _ => SlotColor::DefaultToday,
            }
        })
        .collect();

    let tomorrow = timeline.tomorrow_values.as_ref().map(|values| {
        values
            .iter()
            .map(|value| match value {
                Some(v) if threshold.tomorrow.highlights(*v) => SlotColor::BelowThreshold,
                _ => SlotColor::DefaultTomorrow,
            })
            .collect()
    });

    ChannelColors { today, tomorrow }
}
