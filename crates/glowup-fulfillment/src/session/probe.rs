//! Session validity health probe.

use glowup_browser::{LaunchOptions, WaitUntil};
use tracing::{debug, warn};

use super::SessionSupervisor;

impl SessionSupervisor<'_> {
    /// Whether the stored session still reaches the account page.
    ///
    /// Fails closed: any launch or navigation error reads as `false`.
    pub async fn probe(&self) -> bool {
        if !self.store.exists() {
            return false;
        }

        let page = match self
            .driver
            .launch(LaunchOptions {
                headless: self.probe_headless,
                profile_dir: self.store.profile_dir(),
            })
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!("Session probe could not launch a browser: {}", e);
                return false;
            }
        };

        let snapshot = async {
            page.navigate(
                &self.retailer.session_probe_url,
                WaitUntil::DomContentLoaded,
                self.timing.probe_timeout(),
            )
            .await?;
            page.snapshot().await
        }
        .await;

        if let Err(e) = page.close().await {
            warn!("Failed to close probe browser: {}", e);
        }

        match snapshot {
            Ok(snapshot) => self.signals.is_account_page(&snapshot),
            Err(e) => {
                debug!("Session probe failed: {}", e);
                false
            }
        }
    }
}
