//! Data models for the pricecontrol dashboard
//!
//! Price series, the merged timeline, bar colors, chart input, devices and config.
//! Services build and transform these; nothing here talks to the network.

pub mod chart;
pub mod color;
pub mod config;
pub mod device;
pub mod price;
pub mod timeline;

// Re-export commonly used types for convenience
pub use chart::ChartData;
pub use color::{ChannelColors, SlotColor};
pub use config::{DashboardConfig, PriceConfig};
pub use device::{Device, DeviceMode, DeviceState, Devices, Threshold, TriggerPrice};
pub use price::{PricePoint, Series};
pub use timeline::{MergedTimeline, SlotLabel};
