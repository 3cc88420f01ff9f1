//! Navigation operations for CDP page session.

use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::cdp::error::CdpError;
use crate::driver::{PageSnapshot, WaitUntil};

use super::core::PageSession;

const READY_POLL: Duration = Duration::from_millis(100);

/// Marker planted on the outgoing document; its absence means the
/// navigation has committed a new one.
const NAV_MARKER: &str = "__glowupPrevDocument";

impl PageSession {
    /// Navigate to `url` and wait for the requested load milestone.
    pub async fn navigate(&self, url: &str, wait: WaitUntil, timeout: Duration) -> Result<(), CdpError> {
        // Chrome resolves relative URLs against about:blank and fails late.
        Url::parse(url)?;
        self.plant_marker().await;

        let result = self.call("Page.navigate", Some(json!({"url": url}))).await?;

        if let Some(error) = result.get("errorText").and_then(|e| e.as_str()) {
            return Err(CdpError::NavigationFailed(format!("{}: {}", url, error)));
        }

        // Same-document navigations report no loaderId.
        let new_document = result.get("loaderId").is_some();
        self.wait_for_load(wait, new_document, timeout).await?;

        debug!("Navigated to {}", url);
        Ok(())
    }

    pub async fn reload(&self, wait: WaitUntil, timeout: Duration) -> Result<(), CdpError> {
        self.plant_marker().await;
        self.call("Page.reload", None).await?;
        self.wait_for_load(wait, true, timeout).await
    }

    /// Poll `document.readyState` until `wait` is satisfied.
    pub async fn wait_for_load(
        &self,
        wait: WaitUntil,
        new_document: bool,
        timeout: Duration,
    ) -> Result<(), CdpError> {
        let deadline = Instant::now() + timeout;
        let probe = format!(
            "(() => ({{ state: document.readyState, stale: window.{} === true }}))()",
            NAV_MARKER
        );

        loop {
            // Evaluation fails transiently while the old context is torn down.
            if let Ok(value) = self.evaluate(&probe).await {
                let state = value["state"].as_str().unwrap_or("loading");
                let stale = new_document && value["stale"].as_bool().unwrap_or(false);
                if !stale && wait.is_satisfied_by(state) {
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                return Err(CdpError::Timeout(format!(
                    "Page load not reached within {}ms",
                    timeout.as_millis()
                )));
            }

            tokio::time::sleep(READY_POLL).await;
        }
    }

    /// Current URL, title and rendered text in one round trip.
    pub async fn snapshot(&self) -> Result<PageSnapshot, CdpError> {
        let value = self
            .evaluate(
                "(() => ({ url: window.location.href, title: document.title, \
                 text: document.body ? document.body.innerText : '' }))()",
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn plant_marker(&self) {
        let _ = self.evaluate(&format!("window.{} = true", NAV_MARKER)).await;
    }
}
