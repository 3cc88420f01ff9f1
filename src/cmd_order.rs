//! One-shot subcommands: session setup, session probe and single orders.

use std::path::Path;

use tracing::info;

use glowup_config::Config;
use glowup_fulfillment::OrderRequest;

use crate::server::build_engine;

/// Run the supervised login flow and print its message.
pub(crate) async fn setup_session(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(&config);
    info!("Opening a browser window, log in to {} to continue", engine.retailer().name);
    let outcome = engine.setup_session().await;
    println!("{}", outcome.message);
    if outcome.success {
        Ok(())
    } else {
        Err(outcome.message.into())
    }
}

/// Probe the saved session and print whether it is still logged in.
pub(crate) async fn session_status(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine(&config);
    if engine.is_session_valid().await {
        println!("valid");
    } else {
        println!("invalid");
    }
    Ok(())
}

/// Read an order request from disk.
pub(crate) fn read_order(path: &Path) -> Result<OrderRequest, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let request: OrderRequest = serde_json::from_str(&content)?;
    request.validate()?;
    Ok(request)
}

/// Place one order and print the result as JSON.
pub(crate) async fn place_order(config: Config, order: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let request = read_order(order)?;
    let engine = build_engine(&config);
    let result = engine.process_order(&request).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    if result.success {
        Ok(())
    } else {
        Err(result
            .error
            .unwrap_or_else(|| "Order was not placed".to_string())
            .into())
    }
}
