//! Browser driver capability contract.
//!
//! The fulfillment engine programs against these two traits only. The CDP
//! implementation lives in [`crate::chrome`]; tests substitute a scripted
//! page.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BrowserError;

/// How a browser instance should be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Run without a visible window.
    pub headless: bool,
    /// Persistent profile (cookies, local storage) to bind the instance to.
    pub profile_dir: PathBuf,
}

impl LaunchOptions {
    pub fn headless(profile_dir: impl Into<PathBuf>) -> Self {
        Self {
            headless: true,
            profile_dir: profile_dir.into(),
        }
    }

    pub fn visible(profile_dir: impl Into<PathBuf>) -> Self {
        Self {
            headless: false,
            profile_dir: profile_dir.into(),
        }
    }
}

/// Load milestone a navigation waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitUntil {
    /// `document.readyState` is `interactive` or later.
    #[default]
    DomContentLoaded,
    /// `document.readyState` is `complete`.
    Load,
}

impl WaitUntil {
    /// Whether a `document.readyState` value satisfies this condition.
    pub fn is_satisfied_by(self, ready_state: &str) -> bool {
        match self {
            WaitUntil::DomContentLoaded => ready_state == "interactive" || ready_state == "complete",
            WaitUntil::Load => ready_state == "complete",
        }
    }
}

/// Rendered state of the current document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    /// `document.body.innerText`.
    pub text: String,
}

/// Resolved element state for a CSS selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    pub disabled: bool,
}

/// Last-resort locator: an element among `tags` whose visible text contains
/// `contains` (case-insensitive), contains none of `excludes`, and is not
/// disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextMatch {
    pub tags: Vec<String>,
    pub contains: String,
    pub excludes: Vec<String>,
}

impl TextMatch {
    pub fn new(tags: &[&str], contains: &str) -> Self {
        Self {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            contains: contains.to_lowercase(),
            excludes: Vec::new(),
        }
    }

    pub fn excluding(mut self, text: &str) -> Self {
        self.excludes.push(text.to_lowercase());
        self
    }

    /// Whether an element with this tag, text and disabled flag qualifies.
    pub fn accepts(&self, tag: &str, text: &str, disabled: bool) -> bool {
        if disabled || !self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
        let text = text.to_lowercase();
        text.contains(&self.contains) && !self.excludes.iter().any(|e| text.contains(e))
    }
}

/// A capability that starts browser instances.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Start one browser instance with a single page.
    async fn launch(&self, options: LaunchOptions) -> Result<Box<dyn Page>, BrowserError>;
}

/// A single page of a running browser instance.
///
/// Closing the page shuts the owning browser down.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate and wait for `wait` or fail after `timeout`.
    async fn navigate(&self, url: &str, wait: WaitUntil, timeout: Duration) -> Result<(), BrowserError>;

    /// Reload the current document.
    async fn reload(&self, wait: WaitUntil, timeout: Duration) -> Result<(), BrowserError>;

    /// Current URL, title and rendered text.
    async fn snapshot(&self) -> Result<PageSnapshot, BrowserError>;

    /// State of the first element matching `selector`, if any.
    async fn element_state(&self, selector: &str) -> Result<Option<ElementState>, BrowserError>;

    /// Resolve a text heuristic to a selector addressing the matched element.
    async fn find_by_text(&self, matcher: &TextMatch) -> Result<Option<String>, BrowserError>;

    async fn click(&self, selector: &str) -> Result<(), BrowserError>;

    /// Replace the value of an input.
    async fn fill(&self, selector: &str, value: &str) -> Result<(), BrowserError>;

    /// Choose an option of a `<select>` by value or label.
    async fn select_option(&self, selector: &str, value: &str) -> Result<(), BrowserError>;

    /// Evaluate a script in the page and return its JSON value.
    async fn evaluate(&self, script: &str) -> Result<Value, BrowserError>;

    /// Write a full-page PNG to `path`.
    async fn screenshot(&self, path: &Path) -> Result<(), BrowserError>;

    /// Shut the browser down, flushing the profile to disk.
    async fn close(&self) -> Result<(), BrowserError>;
}
