//! HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use glowup_config::ServerConfig;

use crate::http::routes::create_router;
use crate::state::AppState;

pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve until ctrl-c.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = create_router(self.state.clone());

        let addr: SocketAddr = self.addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!("GlowUp API listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowup_config::Config;
    use glowup_fulfillment::FulfillmentEngine;

    #[test]
    fn test_server_addr() {
        struct NoBrowser;

        #[async_trait::async_trait]
        impl glowup_browser::BrowserDriver for NoBrowser {
            async fn launch(
                &self,
                _options: glowup_browser::LaunchOptions,
            ) -> Result<Box<dyn glowup_browser::Page>, glowup_browser::BrowserError> {
                Err(glowup_browser::BrowserError::ChromeNotFound)
            }
        }

        let config = Config::default();
        let engine = Arc::new(FulfillmentEngine::new(&config, Arc::new(NoBrowser)));
        let server = ApiServer::new(
            ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8443,
            },
            Arc::new(AppState::new(engine)),
        );
        assert_eq!(server.addr(), "0.0.0.0:8443");
    }
}
