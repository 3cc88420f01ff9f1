//! DevTools client errors.

use thiserror::Error;

use super::protocol::ProtocolError;

#[derive(Debug, Error)]
pub enum CdpError {
    /// `/json/version` did not answer.
    #[error("Chrome not available at {0}")]
    ChromeNotAvailable(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("CDP error: {} (code: {})", .0.message, .0.code)]
    Protocol(ProtocolError),

    #[error("Malformed payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The browser answered but left out a field the command promises.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// The socket went away while a command was outstanding.
    #[error("Session closed")]
    SessionClosed,
}

impl CdpError {
    /// A protocol "server error", which several DOM commands use to say a
    /// node exists but cannot be measured or acted on.
    pub fn is_server_error(&self) -> bool {
        matches!(self, CdpError::Protocol(e) if e.code == ProtocolError::SERVER_ERROR)
    }
}

impl From<ProtocolError> for CdpError {
    fn from(e: ProtocolError) -> Self {
        CdpError::Protocol(e)
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::NavigationFailed(format!("Invalid URL: {}", e))
    }
}
