use reqwest::Client as HttpClient;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{ApiError, SwitchAction, SwitchResponse};
use crate::models::{Devices, PriceConfig};
use crate::utils::errors::condense_error_body;

/// Client for the pricecontrol backend web UI endpoints
#[derive(Clone)]
pub struct PricecontrolClient {
    http_client: HttpClient,
    base_url: String,
}

impl PricecontrolClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    const MAX_LOGGED_BODY: usize = 200;

    /// Create a new client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let http_client = HttpClient::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                HttpClient::new()
            });

        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();
        let body_text = condense_error_body(&body_text, Self::MAX_LOGGED_BODY);

        match status_code {
            403 => ApiError::Forbidden(body_text),
            404 => ApiError::NotFound(body_text),
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    fn request_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(Self::REQUEST_TIMEOUT.as_millis() as u64)
        } else {
            ApiError::RequestError(format!("Request failed: {}", e))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Self::request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse {}: {}", path, e)))
    }

    /// GET /today
    ///
    /// Raw price array; the currency key is only known after `/config`.
    pub async fn get_today(&self) -> Result<Value, ApiError> {
        self.get_json("/today").await
    }

    /// GET /tomorrow
    ///
    /// Usually empty or failing until the day-ahead prices are published.
    pub async fn get_tomorrow(&self) -> Result<Value, ApiError> {
        self.get_json("/tomorrow").await
    }

    /// GET /config
    pub async fn get_config(&self) -> Result<PriceConfig, ApiError> {
        self.get_json("/config").await
    }

    /// GET /devices
    pub async fn get_devices(&self) -> Result<Devices, ApiError> {
        self.get_json("/devices").await
    }

    /// GET /health
    ///
    /// # Returns
    /// * `Ok(())` - Backend answered with a 2xx status
    /// * `Err(ApiError)` - Request failed or backend answered with an error status
    pub async fn health(&self) -> Result<(), ApiError> {
        let response = self
            .http_client
            .get(self.endpoint("/health"))
            .send()
            .await
            .map_err(Self::request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        Ok(())
    }

    /// Build `{base}/switchon/{name}` with `name` percent-encoded as a single segment
    pub fn switch_url(&self, name: &str, action: SwitchAction) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push(action.path())
            .push(name);

        Ok(url)
    }

    /// POST /switchon/{name} or /switchoff/{name}
    ///
    /// # Arguments
    /// * `name` - Device name as listed by `/devices`
    /// * `action` - Which way to switch
    ///
    /// # Returns
    /// * `Ok(SwitchResponse)` - Backend accepted the command
    /// * `Err(ApiError)` - `Forbidden` when web UI switching is disabled,
    ///   `NotFound` for unknown devices
    pub async fn switch(
        &self,
        name: &str,
        action: SwitchAction,
    ) -> Result<SwitchResponse, ApiError> {
        let url = self.switch_url(name, action)?;
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(url)
            .send()
            .await
            .map_err(Self::request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<SwitchResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}
