//! Bar color models

/// Color state of one bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotColor {
    /// The slot containing "now"
    Current,
    DefaultToday,
    DefaultTomorrow,
    /// Price strictly below the hovered device's trigger price
    BelowThreshold,
}

impl SlotColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SlotColor::Current => (255, 165, 0),
            SlotColor::DefaultToday => (136, 136, 136),
            SlotColor::DefaultTomorrow => (85, 85, 85),
            SlotColor::BelowThreshold => (0, 128, 0),
        }
    }
}

/// One color per label index for a single channel
pub type ColorSequence = Vec<SlotColor>;

/// Colors for both channels; `tomorrow` only exists with a tomorrow channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelColors {
    pub today: ColorSequence,
    pub tomorrow: Option<ColorSequence>,
}
