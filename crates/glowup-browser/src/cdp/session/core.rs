//! Page session handle and command dispatch.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::cdp::client::Transport;
use crate::cdp::error::CdpError;

/// Domains the page operations depend on. Page for navigation and capture,
/// DOM for node lookup and geometry, Runtime for evaluation.
const DOMAINS: [&str; 3] = ["Page.enable", "DOM.enable", "Runtime.enable"];

/// A flattened session attached to one tab. Every command it sends is
/// routed through the browser connection with this session's id.
pub struct PageSession {
    target_id: String,
    session_id: String,
    transport: Arc<Transport>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, transport: Arc<Transport>) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .send(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        for domain in DOMAINS {
            self.call(domain, None).await?;
        }
        debug!("Page session {} ready on target {}", self.session_id, self.target_id);
        Ok(())
    }

    /// Full-page PNG as base64, including content below the fold.
    pub async fn screenshot(&self) -> Result<String, CdpError> {
        let result = self
            .call(
                "Page.captureScreenshot",
                Some(json!({"format": "png", "captureBeyondViewport": true})),
            )
            .await?;

        match result["data"].as_str() {
            Some(data) => Ok(data.to_string()),
            None => Err(CdpError::InvalidResponse("Missing screenshot data".to_string())),
        }
    }
}
