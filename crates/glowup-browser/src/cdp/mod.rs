//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! Connects to Chrome/Chromium via WebSocket and communicates using the CDP
//! JSON-RPC protocol. Only the domains the fulfillment flow needs are
//! enabled: Page, DOM and Runtime.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.new_page().await?;
//! page.navigate("https://example.com", WaitUntil::DomContentLoaded, timeout).await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
