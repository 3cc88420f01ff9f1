//! Fulfillment error types.

use thiserror::Error;

use glowup_browser::BrowserError;

/// Terminal outcomes of a checkout run that are not a placed order or a
/// manual-review hand-off.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Session expired. Please re-authenticate.")]
    SessionExpired,

    #[error("Failed to add products to cart")]
    NothingAdded,

    /// Unexpected browser failure; aborts the attempt.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// An order request that breaks the data model's own invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Item \"{0}\" has quantity 0")]
    ZeroQuantity(String),

    #[error("Item \"{0}\" has a negative price")]
    NegativePrice(String),
}

/// Session store errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid session marker: {0}")]
    InvalidMarker(#[from] serde_json::Error),

    #[error(transparent)]
    Browser(#[from] BrowserError),
}
