//! Checkout state machine.
//!
//! Stages run strictly in order on one page: login check, cart clear, add
//! items, go to checkout, shipping, payment, place order. There are no
//! retries inside a run; the whole attempt is the retry unit.

mod cart;
mod submit;

use std::fmt;
use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use glowup_browser::{Page, WaitUntil};
use glowup_config::{DiagnosticsConfig, TimingConfig};

use crate::error::CheckoutError;
use crate::log::OrderLog;
use crate::model::{OrderItem, ShippingAddress};
use crate::retailer::RetailerProfile;
use crate::signals::SignalDetector;

/// Checkout stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutStage {
    LoginCheck,
    CartClear,
    AddItems,
    GoToCheckout,
    Shipping,
    Payment,
    PlaceOrder,
}

impl CheckoutStage {
    pub const ALL: [CheckoutStage; 7] = [
        CheckoutStage::LoginCheck,
        CheckoutStage::CartClear,
        CheckoutStage::AddItems,
        CheckoutStage::GoToCheckout,
        CheckoutStage::Shipping,
        CheckoutStage::Payment,
        CheckoutStage::PlaceOrder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckoutStage::LoginCheck => "login check",
            CheckoutStage::CartClear => "cart clear",
            CheckoutStage::AddItems => "add items",
            CheckoutStage::GoToCheckout => "go to checkout",
            CheckoutStage::Shipping => "shipping",
            CheckoutStage::Payment => "payment",
            CheckoutStage::PlaceOrder => "place order",
        }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal checkout error tagged with the stage that raised it.
#[derive(Debug, Error)]
#[error("{stage}: {source}")]
pub struct StageError {
    pub stage: CheckoutStage,
    #[source]
    pub source: CheckoutError,
}

fn at(stage: CheckoutStage) -> impl FnOnce(CheckoutError) -> StageError {
    move |source| StageError { stage, source }
}

/// How a run that reached the place-order stage ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// The submission control was activated.
    Placed {
        subtotal: Decimal,
        /// Scraped retailer order number, if the confirmation page had one.
        order_number: Option<String>,
    },
    /// No submission control could be activated.
    ManualReview {
        subtotal: Decimal,
        screenshot: Option<PathBuf>,
    },
}

/// One checkout run bound to a page.
pub struct Checkout<'a> {
    pub(crate) page: &'a dyn Page,
    pub(crate) retailer: &'a RetailerProfile,
    pub(crate) signals: &'a dyn SignalDetector,
    pub(crate) timing: &'a TimingConfig,
    pub(crate) diagnostics: &'a DiagnosticsConfig,
}

impl<'a> Checkout<'a> {
    pub fn new(
        page: &'a dyn Page,
        retailer: &'a RetailerProfile,
        signals: &'a dyn SignalDetector,
        timing: &'a TimingConfig,
        diagnostics: &'a DiagnosticsConfig,
    ) -> Self {
        Self {
            page,
            retailer,
            signals,
            timing,
            diagnostics,
        }
    }

    /// Run every stage over the eligible items.
    pub async fn run(
        &self,
        items: &[OrderItem],
        address: &ShippingAddress,
        log: &mut OrderLog,
    ) -> Result<CheckoutOutcome, StageError> {
        debug!(stage = %CheckoutStage::LoginCheck, "entering stage");
        self.login_check(log).await.map_err(at(CheckoutStage::LoginCheck))?;

        debug!(stage = %CheckoutStage::CartClear, "entering stage");
        self.cart_clear(log).await.map_err(at(CheckoutStage::CartClear))?;

        debug!(stage = %CheckoutStage::AddItems, "entering stage");
        let subtotal = self.add_items(items, log).await.map_err(at(CheckoutStage::AddItems))?;

        debug!(stage = %CheckoutStage::GoToCheckout, "entering stage");
        self.go_to_checkout(log).await.map_err(at(CheckoutStage::GoToCheckout))?;

        debug!(stage = %CheckoutStage::Shipping, "entering stage");
        self.shipping(address, log).await.map_err(at(CheckoutStage::Shipping))?;

        debug!(stage = %CheckoutStage::Payment, "entering stage");
        self.payment(log).await.map_err(at(CheckoutStage::Payment))?;

        debug!(stage = %CheckoutStage::PlaceOrder, "entering stage");
        self.place_order(subtotal, log).await.map_err(at(CheckoutStage::PlaceOrder))
    }

    async fn goto(&self, url: &str) -> Result<(), CheckoutError> {
        self.page
            .navigate(url, WaitUntil::DomContentLoaded, self.timing.navigation_timeout())
            .await?;
        Ok(())
    }
}

/// Sleep unless the delay is zero.
pub(crate) async fn settle(delay: std::time::Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;
