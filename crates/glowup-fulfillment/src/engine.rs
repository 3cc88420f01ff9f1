//! Fulfillment engine: one order attempt from request to result.
//!
//! [`FulfillmentEngine::process_order`] is total. Every failure, including
//! an unexpected browser error in the middle of checkout, folds into an
//! [`OrderResult`], and the browser launched for the attempt is closed
//! exactly once on every path.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use glowup_browser::{BrowserDriver, LaunchOptions, Page};
use glowup_config::{Config, DiagnosticsConfig, PricingConfig, TimingConfig};

use crate::checkout::{Checkout, CheckoutOutcome, StageError};
use crate::cost::CostBreakdown;
use crate::error::CheckoutError;
use crate::log::OrderLog;
use crate::model::{FailureKind, OrderRequest, OrderResult};
use crate::partition::Partition;
use crate::retailer::RetailerProfile;
use crate::session::{SessionStore, SessionSupervisor, SetupOutcome};
use crate::signals::{SignalDetector, TextSignals};

const MANUAL_REVIEW_ERROR: &str =
    "Manual review required: could not complete checkout automatically. Check debug screenshot.";

/// Locally generated order reference used when the confirmation page
/// carries no order number.
///
/// Millisecond timestamp plus the first eight hex digits of the attempt id,
/// so two attempts in the same millisecond still differ.
pub fn fallback_order_id(attempt_id: &Uuid, at: DateTime<Utc>) -> String {
    let simple = attempt_id.simple().to_string();
    format!("GLOWUP-{}-{}", at.timestamp_millis(), &simple[..8])
}

/// Places orders on the supported retailer through a stored session.
///
/// One engine can be shared across concurrent calls. `ChromeDriver` hands
/// out one live page at a time, so attempts against the same session store
/// run one after another rather than racing on the retailer's cart.
pub struct FulfillmentEngine {
    driver: Arc<dyn BrowserDriver>,
    store: SessionStore,
    retailer: RetailerProfile,
    pricing: PricingConfig,
    timing: TimingConfig,
    diagnostics: DiagnosticsConfig,
    signals: Arc<dyn SignalDetector>,
    headless: bool,
}

impl FulfillmentEngine {
    pub fn new(config: &Config, driver: Arc<dyn BrowserDriver>) -> Self {
        Self {
            driver,
            store: SessionStore::new(&config.session.dir),
            retailer: RetailerProfile::from_config(&config.retailer),
            pricing: config.pricing.clone(),
            timing: config.timing.clone(),
            diagnostics: config.diagnostics.clone(),
            signals: Arc::new(TextSignals::default()),
            headless: config.browser.headless,
        }
    }

    /// Replace the page-text detectors.
    pub fn with_signals(mut self, signals: Arc<dyn SignalDetector>) -> Self {
        self.signals = signals;
        self
    }

    pub fn retailer(&self) -> &RetailerProfile {
        &self.retailer
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Run one fulfillment attempt.
    pub async fn process_order(&self, request: &OrderRequest) -> OrderResult {
        let attempt_id = Uuid::new_v4();
        let span = info_span!("order", %attempt_id, user_id = %request.user_id);
        self.attempt(request, attempt_id).instrument(span).await
    }

    async fn attempt(&self, request: &OrderRequest, attempt_id: Uuid) -> OrderResult {
        let mut log = OrderLog::new();
        log.push(format!("Agent initialized for user {}", request.user_id));
        log.push(format!("Processing {} item(s)...", request.items.len()));

        let partition = Partition::split(&request.items, &self.retailer.domain);
        if !partition.ineligible.is_empty() {
            log.push(format!(
                "{} item(s) are not from {}, skipping: {}",
                partition.ineligible.len(),
                self.retailer.name,
                partition.ineligible_names()
            ));
        }

        if partition.eligible.is_empty() {
            let error = format!("No {} products in cart", self.retailer.name);
            log.push(error.clone());
            return OrderResult::failed(FailureKind::NoEligibleItems, error, log.into_lines());
        }

        if !self.store.exists() {
            log.push("No browser session found. Run setup first.");
            return OrderResult::failed(
                FailureKind::SessionMissing,
                format!("No {} session found. Run session setup first.", self.retailer.name),
                log.into_lines(),
            );
        }

        log.push(format!("Launching browser with saved {} session...", self.retailer.name));
        let options = LaunchOptions {
            headless: self.headless,
            profile_dir: self.store.profile_dir(),
        };
        let page = match self.driver.launch(options).await {
            Ok(page) => page,
            Err(e) => {
                log.push(format!("Fatal error: {}", e));
                return OrderResult::failed(
                    FailureKind::Aborted,
                    format!("Agent failed: {}", e),
                    log.into_lines(),
                );
            }
        };

        let outcome = Checkout::new(
            page.as_ref(),
            &self.retailer,
            self.signals.as_ref(),
            &self.timing,
            &self.diagnostics,
        )
        .run(&partition.eligible, &request.shipping_address, &mut log)
        .await;

        // The abort screenshot needs the page, so it is taken before close.
        let abort_screenshot = match &outcome {
            Err(StageError {
                source: CheckoutError::Browser(_),
                ..
            }) => self.error_screenshot(page.as_ref(), &mut log).await,
            _ => None,
        };

        if let Err(e) = page.close().await {
            warn!("Failed to close browser: {}", e);
        }

        match outcome {
            Ok(CheckoutOutcome::Placed {
                subtotal,
                order_number,
            }) => {
                let cost = CostBreakdown::compute(subtotal, &self.pricing);
                for line in cost.summary_lines() {
                    log.push(line);
                }
                let order_id = match order_number {
                    Some(number) => number,
                    None => {
                        let id = fallback_order_id(&attempt_id, Utc::now());
                        log.push(format!("Using local order reference {}", id));
                        id
                    }
                };
                info!(%order_id, total = %cost.total, "order placed");
                OrderResult::placed(order_id, cost, log.into_lines())
            }
            Ok(CheckoutOutcome::ManualReview {
                subtotal,
                screenshot,
            }) => OrderResult::manual_review(
                subtotal,
                MANUAL_REVIEW_ERROR,
                screenshot,
                log.into_lines(),
            ),
            Err(StageError { stage, source }) => match source {
                CheckoutError::SessionExpired => {
                    log.push("Session expired. Run session setup to re-login.");
                    OrderResult::failed(FailureKind::SessionExpired, source.to_string(), log.into_lines())
                }
                CheckoutError::NothingAdded => {
                    OrderResult::failed(FailureKind::NothingAdded, source.to_string(), log.into_lines())
                }
                CheckoutError::Browser(e) => {
                    log.push(format!("Fatal error during {}: {}", stage, e));
                    OrderResult::failed(
                        FailureKind::Aborted,
                        format!("Agent failed: {}", e),
                        log.into_lines(),
                    )
                    .with_screenshot(abort_screenshot)
                }
            },
        }
    }

    async fn error_screenshot(&self, page: &dyn Page, log: &mut OrderLog) -> Option<PathBuf> {
        let path = self.diagnostics.error_screenshot();
        match page.screenshot(&path).await {
            Ok(()) => {
                log.push(format!("Error screenshot saved: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                warn!("Error screenshot failed: {}", e);
                None
            }
        }
    }

    fn supervisor(&self) -> SessionSupervisor<'_> {
        SessionSupervisor::new(
            self.driver.as_ref(),
            &self.store,
            &self.retailer,
            self.signals.as_ref(),
            &self.timing,
        )
        .probe_headless(self.headless)
    }

    /// Supervised one-time login; opens a visible browser.
    pub async fn setup_session(&self) -> SetupOutcome {
        self.supervisor().setup().await
    }

    /// Health probe of the stored session. Never errors.
    pub async fn is_session_valid(&self) -> bool {
        self.supervisor().probe().await
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
