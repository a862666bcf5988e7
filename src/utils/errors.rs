use thiserror::Error;

use crate::api::pricecontrol::ApiError;

/// Errors raised while turning backend data into the dashboard view
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("Malformed price series: {0}")]
    MalformedSeries(String),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Shorten a backend error body for a single log line
///
/// Bodies longer than `max_len` characters are cut and suffixed with `...`,
/// and newlines are folded into spaces.
pub fn condense_error_body(body: &str, max_len: usize) -> String {
    let flat: String = body
        .trim()
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if flat.chars().count() > max_len {
        let cut: String = flat.chars().take(max_len).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}
