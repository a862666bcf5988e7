pub mod chart_service;
pub mod color_service;
pub mod device_service;
pub mod health_service;
pub mod highlight_service;
pub mod merge_service;
pub mod price_service;
pub mod slot_service;
