//! A page of a Chrome process this crate launched.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tokio::process::Child;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::cdp::{CdpClient, PageSession};
use crate::driver::{ElementState, Page, PageSnapshot, TextMatch, WaitUntil};
use crate::error::BrowserError;

/// How long Chrome gets to flush the profile and exit before it is killed.
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// Single page owning its Chrome process and the driver's launch slot.
pub struct ChromePage {
    client: CdpClient,
    session: PageSession,
    child: Mutex<Option<Child>>,
    slot: Mutex<Option<OwnedMutexGuard<()>>>,
    closed: AtomicBool,
}

impl ChromePage {
    pub(crate) fn new(
        client: CdpClient,
        session: PageSession,
        child: Child,
        slot: OwnedMutexGuard<()>,
    ) -> Self {
        Self {
            client,
            session,
            child: Mutex::new(Some(child)),
            slot: Mutex::new(Some(slot)),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), BrowserError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrowserError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl Page for ChromePage {
    async fn navigate(&self, url: &str, wait: WaitUntil, timeout: Duration) -> Result<(), BrowserError> {
        self.ensure_open()?;
        self.session
            .navigate(url, wait, timeout)
            .await
            .map_err(|e| match BrowserError::from(e) {
                BrowserError::Timeout(msg) => BrowserError::Timeout(format!("{}: {}", url, msg)),
                other => other,
            })
    }

    async fn reload(&self, wait: WaitUntil, timeout: Duration) -> Result<(), BrowserError> {
        self.ensure_open()?;
        Ok(self.session.reload(wait, timeout).await?)
    }

    async fn snapshot(&self) -> Result<PageSnapshot, BrowserError> {
        self.ensure_open()?;
        Ok(self.session.snapshot().await?)
    }

    async fn element_state(&self, selector: &str) -> Result<Option<ElementState>, BrowserError> {
        self.ensure_open()?;
        Ok(self.session.element_state(selector).await?)
    }

    async fn find_by_text(&self, matcher: &TextMatch) -> Result<Option<String>, BrowserError> {
        self.ensure_open()?;
        Ok(self.session.find_by_text(matcher).await?)
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        self.ensure_open()?;
        Ok(self.session.click_selector(selector).await?)
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.ensure_open()?;
        Ok(self.session.fill(selector, value).await?)
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.ensure_open()?;
        Ok(self.session.select_option(selector, value).await?)
    }

    async fn evaluate(&self, script: &str) -> Result<Value, BrowserError> {
        self.ensure_open()?;
        Ok(self.session.evaluate(script).await?)
    }

    async fn screenshot(&self, path: &Path) -> Result<(), BrowserError> {
        self.ensure_open()?;
        let data = self.session.screenshot().await?;
        let bytes = STANDARD
            .decode(data)
            .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))?;
        }
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))?;

        debug!("Screenshot written to {}", path.display());
        Ok(())
    }

    async fn close(&self) -> Result<(), BrowserError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        // Held until the process is gone; the next launch reuses the port.
        let _slot = self.slot.lock().await.take();

        if let Err(e) = self.client.close_browser().await {
            warn!("Browser.close failed: {}", e);
        }

        let Some(mut child) = self.child.lock().await.take() else {
            return Ok(());
        };

        match tokio::time::timeout(EXIT_GRACE, child.wait()).await {
            Ok(Ok(status)) => info!("Chrome exited ({})", status),
            Ok(Err(e)) => warn!("Waiting for Chrome failed: {}", e),
            Err(_) => {
                warn!("Chrome did not exit in time, killing");
                child
                    .kill()
                    .await
                    .map_err(|e| BrowserError::ActionFailed(format!("kill Chrome: {}", e)))?;
            }
        }
        Ok(())
    }
}
