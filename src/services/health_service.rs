use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::api::pricecontrol::{ApiError, PricecontrolClient};

/// Backend reachability as shown in the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Connected,
    Disconnected,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Connected => write!(f, "Connected ✔️"),
            HealthStatus::Disconnected => write!(f, "Disconnected ❌"),
        }
    }
}

/// Run one probe, cancelling it after `timeout` so a hung request never piles up
pub async fn probe_with_timeout<F>(probe: F, timeout: Duration) -> HealthStatus
where
    F: Future<Output = Result<(), ApiError>>,
{
    match tokio::time::timeout(timeout, probe).await {
        Ok(Ok(())) => HealthStatus::Connected,
        Ok(Err(e)) => {
            debug!("Health probe failed: {}", e);
            HealthStatus::Disconnected
        }
        Err(_) => {
            debug!("Health probe cancelled after {} ms", timeout.as_millis());
            HealthStatus::Disconnected
        }
    }
}

/// GET /health bounded by `timeout`
pub async fn check_backend(client: &PricecontrolClient, timeout: Duration) -> HealthStatus {
    probe_with_timeout(client.health(), timeout).await
}
