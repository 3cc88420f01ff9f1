//! Session store, supervised setup and validity probe.

mod probe;
mod setup;
mod store;

use glowup_browser::BrowserDriver;
use glowup_config::TimingConfig;

use crate::retailer::RetailerProfile;
use crate::signals::SignalDetector;

pub use setup::SetupOutcome;
pub use store::{SessionMarker, SessionStore};

/// Operator-facing session operations against one store.
pub struct SessionSupervisor<'a> {
    pub(crate) driver: &'a dyn BrowserDriver,
    pub(crate) store: &'a SessionStore,
    pub(crate) retailer: &'a RetailerProfile,
    pub(crate) signals: &'a dyn SignalDetector,
    pub(crate) timing: &'a TimingConfig,
    pub(crate) probe_headless: bool,
}

impl<'a> SessionSupervisor<'a> {
    pub fn new(
        driver: &'a dyn BrowserDriver,
        store: &'a SessionStore,
        retailer: &'a RetailerProfile,
        signals: &'a dyn SignalDetector,
        timing: &'a TimingConfig,
    ) -> Self {
        Self {
            driver,
            store,
            retailer,
            signals,
            timing,
            probe_headless: true,
        }
    }

    /// Run the validity probe with a visible window when `false`. Setup is
    /// always visible.
    pub fn probe_headless(mut self, headless: bool) -> Self {
        self.probe_headless = headless;
        self
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
