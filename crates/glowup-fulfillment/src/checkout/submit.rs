//! Checkout navigation, shipping, payment detection and order submission.

use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::Instant;
use tracing::{debug, warn};

use glowup_browser::PageSnapshot;

use crate::error::CheckoutError;
use crate::log::OrderLog;
use crate::model::ShippingAddress;
use crate::strategy::{Action, FallbackChain};

use super::{Checkout, CheckoutOutcome, settle};

const CONFIRMATION_POLL: Duration = Duration::from_millis(250);

impl Checkout<'_> {
    /// Best effort: downstream stages surface a checkout that did not open.
    pub(super) async fn go_to_checkout(&self, log: &mut OrderLog) -> Result<(), CheckoutError> {
        log.push("Navigating to checkout...");
        self.goto(&self.retailer.cart_url).await?;
        settle(self.timing.ui_settle()).await;

        let outcome = self.retailer.checkout.run(self.page, &Action::Click).await?;
        if outcome.used_heuristic() {
            log.push("  Proceeding to checkout (fallback)...");
        } else if outcome.performed() {
            log.push("  Proceeding to checkout...");
        } else {
            log.push("  Checkout control not found; continuing");
        }

        settle(self.timing.checkout_settle()).await;
        Ok(())
    }

    pub(super) async fn shipping(
        &self,
        address: &ShippingAddress,
        log: &mut OrderLog,
    ) -> Result<(), CheckoutError> {
        log.push("Handling shipping...");
        let snapshot = self.page.snapshot().await?;

        if self.signals.has_saved_address(&snapshot) {
            log.push("  Using saved shipping address");
            return Ok(());
        }
        if address.line1.trim().is_empty() {
            log.push("  No saved address detected and none supplied; continuing");
            return Ok(());
        }

        log.push("  Entering shipping address...");
        let chains = &self.retailer.address;
        let last_name = address.last_name();
        let fields: [(&FallbackChain, &str); 6] = [
            (&chains.first_name, address.first_name()),
            (&chains.last_name, last_name.as_str()),
            (&chains.line1, address.line1.as_str()),
            (&chains.line2, address.line2()),
            (&chains.city, address.city.as_str()),
            (&chains.zip, address.zip.as_str()),
        ];
        for (chain, value) in fields {
            if value.is_empty() {
                continue;
            }
            let outcome = chain.run(self.page, &Action::Fill(value.to_string())).await?;
            if !outcome.performed() {
                log.push(format!("  No field found for {}", chain.name()));
            }
        }

        if !address.state.is_empty() {
            let outcome = chains
                .state
                .run(self.page, &Action::Select(address.state.clone()))
                .await?;
            if !outcome.performed() {
                log.push(format!("  No field found for {}", chains.state.name()));
            }
        }
        settle(self.timing.ui_settle()).await;

        self.retailer
            .shipping_continue
            .run(self.page, &Action::Click)
            .await?;
        settle(self.timing.checkout_settle()).await;

        log.push(format!(
            "  Shipping address entered ({}, {} {}, {})",
            address.city,
            address.state,
            address.zip,
            address.country_or(&self.retailer.default_country)
        ));
        Ok(())
    }

    /// Detection only; payment details are never entered.
    pub(super) async fn payment(&self, log: &mut OrderLog) -> Result<(), CheckoutError> {
        log.push("Confirming payment method...");
        settle(self.timing.ui_settle()).await;

        let snapshot = self.page.snapshot().await?;
        if self.signals.has_saved_payment(&snapshot) {
            log.push("  Using saved payment method");
        } else {
            log.push("  No saved payment method detected; order may need manual payment entry");
        }
        Ok(())
    }

    pub(super) async fn place_order(
        &self,
        subtotal: Decimal,
        log: &mut OrderLog,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        log.push("Placing order...");
        let outcome = self.retailer.place_order.run(self.page, &Action::Click).await?;

        if !outcome.performed() {
            log.push("Could not click \"Place Order\"; checkout requires manual review");
            let path = self.diagnostics.checkout_debug_screenshot();
            let screenshot = match self.page.screenshot(&path).await {
                Ok(()) => {
                    log.push(format!("Debug screenshot saved: {}", path.display()));
                    Some(path)
                }
                Err(e) => {
                    warn!("Debug screenshot failed: {}", e);
                    log.push(format!("Debug screenshot failed: {}", e));
                    None
                }
            };
            return Ok(CheckoutOutcome::ManualReview { subtotal, screenshot });
        }

        log.push("  Waiting for order confirmation...");
        // The click has been sent; from here the order counts as placed.
        let order_number = match self.wait_for_confirmation().await {
            Some(snapshot) => self.signals.extract_order_number(&snapshot),
            None => {
                log.push("  Confirmation page could not be read");
                None
            }
        };
        match &order_number {
            Some(number) => log.push(format!("  Order confirmed: #{}", number)),
            None => log.push("  Order submitted (confirmation number not detected)"),
        }

        Ok(CheckoutOutcome::Placed {
            subtotal,
            order_number,
        })
    }

    /// Poll until the URL looks like a confirmation page or the wait runs
    /// out. A failed read counts as a missed poll, since the submit click
    /// usually replaces the document under us. Returns the last page read.
    async fn wait_for_confirmation(&self) -> Option<PageSnapshot> {
        let deadline = Instant::now() + self.timing.confirmation_timeout();
        let mut last = None;
        loop {
            match self.page.snapshot().await {
                Ok(snapshot) if self.signals.is_confirmation_url(&snapshot.url) => {
                    return Some(snapshot);
                }
                Ok(snapshot) => last = Some(snapshot),
                Err(e) => debug!("Confirmation poll missed: {}", e),
            }
            let now = Instant::now();
            if now >= deadline {
                return last;
            }
            tokio::time::sleep(CONFIRMATION_POLL.min(deadline - now)).await;
        }
    }
}
