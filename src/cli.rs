//! CLI definitions for GlowUp.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// GlowUp fulfillment CLI.
#[derive(Parser)]
#[command(name = "glowup")]
#[command(about = "Automated retailer fulfillment through a supervised browser session")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the HTTP server in foreground (default)
    Run {
        /// Server host, overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Log in once in a visible browser and save the session
    SetupSession,

    /// Check whether the saved session is still logged in
    SessionStatus,

    /// Place one order from a JSON request file
    PlaceOrder {
        /// Order request (userId, items, shippingAddress)
        #[arg(long)]
        order: PathBuf,
    },
}
