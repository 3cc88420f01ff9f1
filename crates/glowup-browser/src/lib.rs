//! Browser automation for GlowUp fulfillment.
//!
//! Exposes a small driver contract ([`BrowserDriver`] / [`Page`]) and a
//! Chrome implementation speaking the Chrome DevTools Protocol directly.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  ChromeDriver   │ ◄──────────────► │  Chrome process  │
//! │  (this crate)   │       CDP        │  (own profile)   │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! Every launch spawns a fresh Chrome with `--user-data-dir` pointing at the
//! caller's profile directory. Closing the page shuts that process down so
//! the profile is flushed before the next launch reads it.

pub mod cdp;
pub mod chrome;
mod driver;
mod error;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use chrome::{ChromeDriver, ChromeDriverConfig, ChromePage};
pub use driver::{
    BrowserDriver, ElementState, LaunchOptions, Page, PageSnapshot, TextMatch, WaitUntil,
};
pub use error::BrowserError;
