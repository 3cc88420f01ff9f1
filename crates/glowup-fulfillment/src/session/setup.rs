//! Supervised one-time login.
//!
//! The storefront exposes no auth event to hook, so completion is detected
//! by polling the rendered page at a fixed interval up to a ceiling.

use glowup_browser::{LaunchOptions, Page, WaitUntil};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::checkout::settle;
use crate::error::SessionError;
use crate::strategy::Action;

use super::SessionSupervisor;

/// Result of a setup run, as reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupOutcome {
    pub success: bool,
    pub message: String,
}

enum Detection {
    Saved,
    TimedOut,
}

impl SessionSupervisor<'_> {
    /// Open a visible browser, wait for the operator to sign in, then
    /// record the session.
    pub async fn setup(&self) -> SetupOutcome {
        match self.try_setup().await {
            Ok(Detection::Saved) => SetupOutcome {
                success: true,
                message: "Session saved. Future orders will use this login.".to_string(),
            },
            Ok(Detection::TimedOut) => SetupOutcome {
                success: false,
                message: "Timeout waiting for login. Try again.".to_string(),
            },
            Err(e) => SetupOutcome {
                success: false,
                message: format!("Setup failed: {}", e),
            },
        }
    }

    async fn try_setup(&self) -> Result<Detection, SessionError> {
        self.store.ensure_dirs().await?;
        info!(
            "Launching visible browser for {} login; profile at {}",
            self.retailer.name,
            self.store.profile_dir().display()
        );
        let page = self
            .driver
            .launch(LaunchOptions::visible(self.store.profile_dir()))
            .await?;

        let result = self.supervise(page.as_ref()).await;

        // Closing flushes the profile to disk.
        if let Err(e) = page.close().await {
            warn!("Failed to close setup browser: {}", e);
        }
        result
    }

    async fn supervise(&self, page: &dyn Page) -> Result<Detection, SessionError> {
        page.navigate(
            &self.retailer.home_url,
            WaitUntil::DomContentLoaded,
            self.timing.navigation_timeout(),
        )
        .await?;
        settle(self.timing.ui_settle()).await;

        if self.signals.is_maintenance(&page.snapshot().await?) {
            warn!("Maintenance page detected, retrying once");
            settle(self.timing.maintenance_retry()).await;
            page.reload(WaitUntil::DomContentLoaded, self.timing.navigation_timeout())
                .await?;
            settle(self.timing.ui_settle()).await;
        }

        if self.retailer.sign_in.run(page, &Action::Click).await?.performed() {
            info!("Opened sign-in from the storefront");
        } else {
            info!("No sign-in link found, going to {}", self.retailer.login_url);
            page.navigate(
                &self.retailer.login_url,
                WaitUntil::DomContentLoaded,
                self.timing.navigation_timeout(),
            )
            .await?;
        }
        settle(self.timing.ui_settle()).await;

        info!(
            "Waiting up to {}s for the operator to sign in to {}",
            self.timing.setup_timeout().as_secs(),
            self.retailer.name
        );

        let deadline = Instant::now() + self.timing.setup_timeout();
        while Instant::now() < deadline {
            match page.snapshot().await {
                Ok(snapshot) => {
                    if self.signals.is_maintenance(&snapshot) {
                        warn!("Still seeing a maintenance page; navigate to sign-in manually");
                    }
                    if self.signals.is_login_complete(&snapshot) {
                        info!("Login detected at {}, stabilizing session", snapshot.url);
                        settle(self.timing.setup_verify_settle()).await;
                        if self.verify(page).await {
                            self.store.mark_ready(&self.retailer.name).await?;
                            info!("Session saved to {}", self.store.dir().display());
                            return Ok(Detection::Saved);
                        }
                        warn!("Verification redirected to sign-in, continuing to wait");
                    }
                }
                // Mid-navigation evaluations fail; the next poll retries.
                Err(e) => debug!("Login poll skipped: {}", e),
            }
            tokio::time::sleep(self.timing.setup_poll_interval()).await;
        }

        Ok(Detection::TimedOut)
    }

    /// Reload the account page; landing back on sign-in means the login
    /// did not stick.
    async fn verify(&self, page: &dyn Page) -> bool {
        if let Err(e) = page
            .navigate(
                &self.retailer.account_url,
                WaitUntil::DomContentLoaded,
                self.timing.navigation_timeout(),
            )
            .await
        {
            warn!("Verification navigation failed ({}), assuming logged in", e);
            return true;
        }
        match page.snapshot().await {
            Ok(snapshot) => !self.signals.is_login_url(&snapshot.url),
            Err(_) => true,
        }
    }
}
