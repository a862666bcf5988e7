use chrono::{Local, NaiveTime, Timelike};

use crate::models::SlotLabel;

/// Length of one price slot in minutes
pub const SLOT_MINUTES: u32 = 15;

/// Source of wall-clock time for "now" lookups
pub trait Clock {
    fn now(&self) -> NaiveTime;
}

/// Local wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Label of the slot containing `ts`, e.g. 13:07 -> "13:00"
///
/// Uses the timestamp's own wall time, so a `+02:00` series keeps its local hours.
pub fn label_of<T: Timelike>(ts: &T) -> SlotLabel {
    let minute = ts.minute() / SLOT_MINUTES * SLOT_MINUTES;
    SlotLabel::from_parts(ts.hour(), minute)
}

/// Label of the slot containing the current wall-clock time
pub fn current_label(clock: &dyn Clock) -> SlotLabel {
    label_of(&clock.now())
}
