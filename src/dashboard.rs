//! Dashboard state shared by the refresh loops and operator commands
//!
//! Every refresh rebuilds its own output in full: a price refresh replaces the
//! timeline, baseline and chart; a device refresh replaces the cards and their
//! thresholds. Hover events only ever recolor the chart that is live right now.
//!
//! Backend requests run on spawned tasks and report back as [`Update`]s, so a
//! slow backend never holds up hover, leave or the other refresh loops.

use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::api::pricecontrol::{ApiError, PricecontrolClient, SwitchAction};
use crate::models::{Device, PriceConfig, Series};
use crate::services::chart_service::{ChartManager, ChartSurface};
use crate::services::color_service::baseline;
use crate::services::device_service::render_device_panel;
use crate::services::health_service::{check_backend, HealthStatus};
use crate::services::highlight_service::{HighlightController, HoverState, RenderedView};
use crate::services::merge_service::merge;
use crate::services::price_service::{current_prices, format_price_cards, CurrentPrices};
use crate::services::slot_service::{current_label, Clock};
use crate::utils::errors::DashboardError;

/// What happened to a switch command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Request dispatched; the result is only logged
    Sent,
    /// Backend config has web UI switching turned off
    Disabled,
    /// No config fetched yet, so switching permission is unknown
    NoConfig,
}

/// Everything one price cycle fetched from the backend
#[derive(Debug)]
pub struct FetchedPrices {
    pub config: PriceConfig,
    pub today: Series,
    pub tomorrow: Option<Series>,
}

/// Result of a background fetch, applied on the event loop
#[derive(Debug)]
pub enum Update {
    Prices(Result<FetchedPrices, DashboardError>),
    Devices(Result<Vec<Device>, ApiError>),
    Health(HealthStatus),
}

// At most one fetch of each kind runs at a time
#[derive(Debug, Default)]
struct InFlight {
    prices: bool,
    devices: bool,
    health: bool,
}

/// Tomorrow is optional; any failure, a malformed body or an empty array means
/// "no tomorrow channel"
pub fn tomorrow_series(result: Result<Value, ApiError>, currency: &str) -> Option<Series> {
    let json = match result {
        Ok(json) => json,
        Err(e) => {
            debug!("No tomorrow prices: {}", e);
            return None;
        }
    };

    match Series::from_json(&json, currency) {
        Ok(series) if !series.is_empty() => Some(series),
        Ok(_) => None,
        Err(e) => {
            debug!("Ignoring tomorrow prices: {}", e);
            None
        }
    }
}

/// `/today` and `/config` are required, `/tomorrow` is best effort
async fn fetch_prices(client: &PricecontrolClient) -> Result<FetchedPrices, DashboardError> {
    let today_json = client.get_today().await?;
    let config = client.get_config().await?;
    let today = Series::from_json(&today_json, &config.currency)?;
    let tomorrow = tomorrow_series(client.get_tomorrow().await, &config.currency);

    Ok(FetchedPrices {
        config,
        today,
        tomorrow,
    })
}

pub struct Dashboard<S: ChartSurface> {
    client: PricecontrolClient,
    chart: ChartManager<S>,
    highlight: HighlightController,
    clock: Box<dyn Clock>,
    view: Option<RenderedView>,
    price_config: Option<PriceConfig>,
    devices: Vec<Device>,
    prices: Option<CurrentPrices>,
    health: Option<HealthStatus>,
    in_flight: InFlight,
}

impl<S: ChartSurface> Dashboard<S> {
    pub fn new(client: PricecontrolClient, surface: S, clock: Box<dyn Clock>) -> Self {
        Self {
            client,
            chart: ChartManager::new(surface),
            highlight: HighlightController::new(),
            clock,
            view: None,
            price_config: None,
            devices: Vec::new(),
            prices: None,
            health: None,
            in_flight: InFlight::default(),
        }
    }

    pub fn current_prices(&self) -> Option<&CurrentPrices> {
        self.prices.as_ref()
    }

    pub fn view(&self) -> Option<&RenderedView> {
        self.view.as_ref()
    }

    pub fn chart(&self) -> &ChartManager<S> {
        &self.chart
    }

    pub fn hover_state(&self) -> &HoverState {
        self.highlight.state()
    }

    /// Spawn a price fetch unless one is still running. Returns whether one was spawned.
    pub fn start_price_fetch(&mut self, tx: &UnboundedSender<Update>) -> bool {
        if self.in_flight.prices {
            debug!("Price fetch still running, tick skipped");
            return false;
        }
        self.in_flight.prices = true;

        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = fetch_prices(&client).await;
            // A closed channel means the loop has stopped
            let _ = tx.send(Update::Prices(result));
        });
        true
    }

    pub fn start_device_fetch(&mut self, tx: &UnboundedSender<Update>) -> bool {
        if self.in_flight.devices {
            debug!("Device fetch still running, tick skipped");
            return false;
        }
        self.in_flight.devices = true;

        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client.get_devices().await.map(|d| d.device);
            let _ = tx.send(Update::Devices(result));
        });
        true
    }

    pub fn start_health_check(&mut self, tx: &UnboundedSender<Update>, timeout: Duration) -> bool {
        if self.in_flight.health {
            return false;
        }
        self.in_flight.health = true;

        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let status = check_backend(&client, timeout).await;
            let _ = tx.send(Update::Health(status));
        });
        true
    }

    /// Apply a finished fetch. Failed price fetches keep the previous chart.
    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Prices(result) => {
                self.in_flight.prices = false;
                match result {
                    Ok(fetched) => {
                        let FetchedPrices {
                            config,
                            today,
                            tomorrow,
                        } = fetched;
                        if let Err(e) = self.apply_prices(config, &today, tomorrow.as_ref()) {
                            error!("Failed to render price chart: {}", e);
                        }
                    }
                    Err(e) => warn!("Price refresh skipped: {}", e),
                }
            }
            Update::Devices(result) => {
                self.in_flight.devices = false;
                match result {
                    Ok(devices) => self.apply_devices(devices),
                    Err(e) => warn!("Device refresh skipped: {}", e),
                }
            }
            Update::Health(status) => {
                self.in_flight.health = false;
                if self.health != Some(status) {
                    info!("Backend {}", status);
                }
                self.health = Some(status);
            }
        }
    }

    /// Merge, color and render one price cycle.
    ///
    /// Price cards, config and view change together, and only once the new
    /// chart is built; a failed build leaves all of them on the previous cycle.
    pub fn apply_prices(
        &mut self,
        config: PriceConfig,
        today: &Series,
        tomorrow: Option<&Series>,
    ) -> Result<(), DashboardError> {
        let timeline = merge(today, tomorrow);
        let current = current_label(self.clock.as_ref());
        let colors = baseline(&timeline, &current);

        self.chart.render(&config.currency, &timeline, &colors)?;

        let prices = current_prices(&timeline, &current, &config);
        let [spot, total] = format_price_cards(prices.as_ref());
        info!(
            "Prices refreshed: {} slots today, tomorrow {}, now {} | {} | {}",
            today.len(),
            if timeline.has_tomorrow() { "available" } else { "not published" },
            current,
            spot,
            total
        );

        self.prices = prices;
        self.view = Some(RenderedView {
            currency: config.currency.clone(),
            timeline,
            baseline: colors,
        });
        self.price_config = Some(config);
        Ok(())
    }

    /// Replace the device cards and re-register their thresholds
    pub fn apply_devices(&mut self, devices: Vec<Device>) {
        self.highlight.sync_cards(&devices);
        debug!("{} device cards registered", devices.len());
        self.devices = devices;
    }

    /// Device card hovered
    pub fn hover(&mut self, device: &str) -> Result<(), DashboardError> {
        self.highlight.enter(device, self.view.as_ref(), &mut self.chart)
    }

    /// Device card no longer hovered
    pub fn leave(&mut self) -> Result<(), DashboardError> {
        self.highlight
            .leave(self.view.as_mut(), &mut self.chart, self.clock.as_ref())
    }

    /// Fire-and-forget switch command; needs a tokio runtime when it is sent
    pub fn switch(&self, name: &str, action: SwitchAction) -> SwitchOutcome {
        match &self.price_config {
            None => {
                warn!("Switch {} '{}' ignored, backend config not loaded yet", action, name);
                return SwitchOutcome::NoConfig;
            }
            Some(config) if !config.webui_toggle => {
                warn!("Disabled: switching {} device '{}'", action, name);
                return SwitchOutcome::Disabled;
            }
            Some(_) => {}
        }

        if !self.highlight.is_registered(name) {
            warn!("Switching unknown device '{}', sending anyway", name);
        }

        let client = self.client.clone();
        let name = name.to_string();
        tokio::spawn(async move {
            match client.switch(&name, action).await {
                Ok(response) => info!("{} switched {} ({})", name, action, response.status),
                Err(e) => error!("Error switching {} {}: {}", name, action, e),
            }
        });
        SwitchOutcome::Sent
    }

    /// Multi-line status: health, price cards, hover state and device panel
    pub fn status_report(&self) -> String {
        let health = self
            .health
            .map(|h| h.to_string())
            .unwrap_or_else(|| "Not checked yet".to_string());
        let [spot, total] = format_price_cards(self.current_prices());
        let hover = match self.highlight.state() {
            HoverState::Idle => "none".to_string(),
            HoverState::Hovered { device, threshold } => format!(
                "{} (today {:?}, tomorrow {:?})",
                device, threshold.today, threshold.tomorrow
            ),
        };
        let chart = match self.view() {
            Some(view) if self.chart().is_live() => format!(
                "{} slots in {}{}",
                view.timeline.len(),
                view.currency,
                if view.timeline.has_tomorrow() { ", tomorrow included" } else { "" }
            ),
            _ => "not rendered yet".to_string(),
        };
        let webui_toggle = self
            .price_config
            .as_ref()
            .map(|c| c.webui_toggle)
            .unwrap_or(false);

        format!(
            "Backend: {} ({})\nChart: {}\n{}\n{}\nHovered: {}\n{}",
            health,
            self.client.base_url(),
            chart,
            spot,
            total,
            hover,
            render_device_panel(&self.devices, webui_toggle)
        )
    }
}
