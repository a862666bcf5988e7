use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod dashboard;
mod models;
mod services;
mod utils;

use api::pricecontrol::PricecontrolClient;
use commands::Flow;
use dashboard::Dashboard;
use models::DashboardConfig;
use services::chart_service::PngChartSurface;
use services::slot_service::SystemClock;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    for directive in ["pricecontrol_dashboard=debug", "reqwest=warn", "hyper=warn"] {
        match directive.parse::<Directive>() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Ignoring log directive {}: {}", directive, e),
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("⚡ Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = match DashboardConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    info!("Backend: {}", config.backend_url);
    info!("Chart: {}", config.chart_path.display());

    let client = PricecontrolClient::new(config.backend_url.clone());
    let surface = PngChartSurface::new(config.chart_path.clone(), config.chart_size);
    let mut dashboard = Dashboard::new(client, surface, Box::new(SystemClock));

    // Each loop ticks immediately, then on its own period
    let mut price_tick = interval(config.price_interval);
    let mut device_tick = interval(config.device_interval);
    let mut health_tick = interval(config.health_interval);
    for tick in [&mut price_tick, &mut device_tick, &mut health_tick] {
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    }

    // Fetches run on spawned tasks and come back here, so the loop never waits on the backend
    let (tx, mut updates) = mpsc::unbounded_channel();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    info!("Type 'help' for commands");

    loop {
        tokio::select! {
            _ = price_tick.tick() => {
                dashboard.start_price_fetch(&tx);
            }
            _ = device_tick.tick() => {
                dashboard.start_device_fetch(&tx);
            }
            _ = health_tick.tick() => {
                dashboard.start_health_check(&tx, config.health_timeout);
            }
            Some(update) = updates.recv() => dashboard.apply(update),
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match commands::handle_line(&mut dashboard, &line) {
                    Flow::Continue => {}
                    Flow::Refresh => {
                        dashboard.start_price_fetch(&tx);
                        dashboard.start_device_fetch(&tx);
                    }
                    Flow::Quit => break,
                },
                Ok(None) => {
                    debug!("stdin closed, commands disabled");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!("Failed to read command: {}", e);
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!("Dashboard stopped");
}
