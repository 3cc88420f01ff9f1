//! GlowUp - automated retailer fulfillment
//!
//! Main entry point for the GlowUp CLI and server.

use clap::Parser;

mod cli;
mod cmd_order;
mod server;

use cli::{Cli, Commands};
use server::{init_tracing, load_config, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;

    match cli.command {
        None => run_server(config).await,
        Some(Commands::Run { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await
        }
        Some(Commands::SetupSession) => cmd_order::setup_session(config).await,
        Some(Commands::SessionStatus) => cmd_order::session_status(config).await,
        Some(Commands::PlaceOrder { order }) => cmd_order::place_order(config, &order).await,
    }
}
