//! Startup wiring for GlowUp: tracing, config, engine and HTTP server.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use glowup_api::{ApiServer, AppState};
use glowup_browser::{ChromeDriver, ChromeDriverConfig};
use glowup_config::{Config, ConfigLoader, ConfigValidator, glowup_home};
use glowup_fulfillment::FulfillmentEngine;

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.glowup/debug/ with daily rotation.
pub(crate) fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = glowup_home().join("debug");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("glowup")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Dropping the guard stops the background writer.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load and validate the configuration, logging any warnings.
pub(crate) fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_or_default(path)?;
    let warnings = ConfigValidator::validate(&config).into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    Ok(config)
}

/// Chrome driver settings taken from the `[browser]` section.
pub(crate) fn driver_config(config: &Config) -> ChromeDriverConfig {
    ChromeDriverConfig {
        debug_port: config.browser.debug_port,
        viewport_width: config.browser.viewport_width,
        viewport_height: config.browser.viewport_height,
        chrome_path: config
            .browser
            .chrome_path
            .as_deref()
            .map(|p| ConfigLoader::expand_path(&p.to_string_lossy()).into()),
    }
}

pub(crate) fn build_engine(config: &Config) -> FulfillmentEngine {
    let driver = Arc::new(ChromeDriver::new(driver_config(config)));
    FulfillmentEngine::new(config, driver)
}

/// Run the server in foreground.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting GlowUp v{}", env!("CARGO_PKG_VERSION"));

    let engine = Arc::new(build_engine(&config));
    info!(
        "Fulfillment engine ready for {} (session dir: {})",
        engine.retailer().name,
        engine.store().profile_dir().display()
    );
    if !engine.store().exists() {
        warn!("No saved browser session. Run `glowup setup-session` before placing orders.");
    }

    let state = Arc::new(AppState::new(engine));
    let server = ApiServer::new(config.server.clone(), state);

    info!("GlowUp ready:");
    info!("  API Server:    http://{}", server.addr());
    info!("API Endpoints:");
    info!("  GET  /health                                  - Health check");
    info!("  POST /api/orders                              - Place an order");
    info!("  POST /api/orders/setup-session                - Supervised login");
    info!("  GET  /api/orders/session-status               - Session probe");
    info!("  GET  /api/orders/{{order_id}}/tracking          - Order tracking");
    info!("  GET  /api/orders/user/{{user_id}}/latest-tracking - Latest order for a user");

    server.run().await?;

    info!("Shutting down...");
    Ok(())
}
