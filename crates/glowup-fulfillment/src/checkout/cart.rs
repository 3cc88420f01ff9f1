//! Login check, cart reconciliation and item adding.

use rust_decimal::Decimal;

use crate::error::CheckoutError;
use crate::log::OrderLog;
use crate::model::OrderItem;
use crate::strategy::Action;

use super::{Checkout, settle};

impl Checkout<'_> {
    pub(super) async fn login_check(&self, log: &mut OrderLog) -> Result<(), CheckoutError> {
        log.push("Checking login status...");
        self.goto(&self.retailer.home_url).await?;
        settle(self.timing.ui_settle()).await;

        let snapshot = self.page.snapshot().await?;
        if !self.signals.is_authenticated(&snapshot) {
            log.push("Not logged in; the saved session may have expired");
            return Err(CheckoutError::SessionExpired);
        }

        log.push(format!("Logged into {}", self.retailer.name));
        Ok(())
    }

    /// Remove whatever is already in the bag, bounded so a removal that
    /// silently fails cannot loop forever.
    pub(super) async fn cart_clear(&self, log: &mut OrderLog) -> Result<(), CheckoutError> {
        log.push(format!("Clearing existing {} cart...", self.retailer.name));
        self.goto(&self.retailer.cart_url).await?;
        settle(self.timing.ui_settle()).await;

        let max = self.timing.max_cart_clear_iterations;
        let mut removed = 0;
        while removed < max {
            let outcome = self.retailer.cart_remove.run(self.page, &Action::Click).await?;
            if !outcome.performed() {
                break;
            }
            removed += 1;
            settle(self.timing.cart_remove_settle()).await;
        }

        if removed == 0 {
            log.push("Cart cleared");
        } else if removed == max {
            log.push(format!("Cart cleared (stopped after {} removals)", removed));
        } else {
            log.push(format!("Cart cleared ({} item(s) removed)", removed));
        }
        Ok(())
    }

    /// Add every in-stock item; returns the subtotal of what was added.
    pub(super) async fn add_items(
        &self,
        items: &[OrderItem],
        log: &mut OrderLog,
    ) -> Result<Decimal, CheckoutError> {
        let mut subtotal = Decimal::ZERO;
        let mut added = 0usize;

        for item in items {
            log.push(format!("Adding: {} ({}) x{}", item.name, item.brand, item.quantity));
            // One bad product page skips that item only.
            match self.add_item(item, log).await {
                Ok(true) => {
                    subtotal += item.line_total();
                    added += 1;
                }
                Ok(false) => {}
                Err(e) => log.push(format!("Error adding \"{}\": {}", item.name, e)),
            }
        }

        if added == 0 {
            log.push(format!("Could not add any products to {} bag", self.retailer.name));
            return Err(CheckoutError::NothingAdded);
        }

        log.push(format!(
            "{}/{} items added to {} bag",
            added,
            items.len(),
            self.retailer.name
        ));
        Ok(subtotal)
    }

    async fn add_item(&self, item: &OrderItem, log: &mut OrderLog) -> Result<bool, CheckoutError> {
        self.goto(&item.url).await?;
        settle(self.timing.ui_settle()).await;

        let snapshot = self.page.snapshot().await?;
        if self.signals.is_out_of_stock(&snapshot) {
            log.push(format!("\"{}\" is out of stock, skipping", item.name));
            return Ok(false);
        }

        if item.quantity > 1 {
            let quantity = Action::Select(item.quantity.to_string());
            if self.retailer.quantity.run(self.page, &quantity).await?.performed() {
                log.push(format!("  Set quantity to {}", item.quantity));
                settle(self.timing.quantity_settle()).await;
            } else {
                log.push("  Quantity selector not found");
            }
        }

        let outcome = self.retailer.add_to_bag.run(self.page, &Action::Click).await?;
        if outcome.used_heuristic() {
            log.push(format!("  Added to {} bag (fallback)", self.retailer.name));
        } else if outcome.performed() {
            log.push(format!("  Added to {} bag", self.retailer.name));
        } else {
            log.push(format!("  Could not find \"Add to Bag\" button for \"{}\"", item.name));
        }

        settle(self.timing.bag_update_settle()).await;
        Ok(outcome.performed())
    }
}
