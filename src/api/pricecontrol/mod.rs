pub mod client;
pub mod models;

pub use client::PricecontrolClient;
pub use models::{ApiError, SwitchAction};
