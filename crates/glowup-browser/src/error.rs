//! Browser driver errors.

use thiserror::Error;

use crate::cdp::CdpError;

/// Browser driver errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Browser closed")]
    Closed,

    #[error("Chrome not found. Please install Google Chrome.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Chrome already running on debug port {0}; close it before starting another session")]
    PortInUse(u16),
}

impl BrowserError {
    /// Errors meaning "this locator did not resolve to something usable",
    /// as opposed to a broken browser.
    pub fn is_element_miss(&self) -> bool {
        matches!(self, BrowserError::ElementNotFound(_))
    }
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::ChromeNotAvailable(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::NavigationFailed(msg) => BrowserError::NavigationFailed(msg),
            CdpError::ElementNotFound(msg) => BrowserError::ElementNotFound(msg),
            CdpError::JavaScript(msg) => BrowserError::ActionFailed(format!("JS error: {}", msg)),
            CdpError::Timeout(msg) => BrowserError::Timeout(msg),
            CdpError::SessionClosed => BrowserError::Closed,
            _ => BrowserError::ActionFailed(e.to_string()),
        }
    }
}
