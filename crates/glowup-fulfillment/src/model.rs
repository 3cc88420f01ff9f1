//! Order request and result types exchanged with the app backend.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cost::CostBreakdown;
use crate::error::RequestError;

/// A fully-formed order handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Opaque caller identifier.
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
}

impl OrderRequest {
    /// Reject requests that break the data model's own invariants.
    pub fn validate(&self) -> Result<(), RequestError> {
        if let Some(item) = self.items.iter().find(|i| i.quantity == 0) {
            return Err(RequestError::ZeroQuantity(item.name.clone()));
        }
        if let Some(item) = self.items.iter().find(|i| i.price.is_sign_negative()) {
            return Err(RequestError::NegativePrice(item.name.clone()));
        }
        Ok(())
    }
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    /// Deep link into the retailer's product page.
    #[serde(default)]
    pub url: String,
    pub quantity: u32,
    /// Catalog price at order time.
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ShippingAddress {
    /// First whitespace-separated token of the full name.
    pub fn first_name(&self) -> &str {
        self.full_name.split_whitespace().next().unwrap_or("")
    }

    /// Everything after the first token.
    pub fn last_name(&self) -> String {
        self.full_name
            .split_whitespace()
            .skip(1)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn line2(&self) -> &str {
        self.line2.as_deref().unwrap_or("")
    }

    pub fn country_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.country.as_deref().filter(|c| !c.is_empty()).unwrap_or(default)
    }
}

/// Why an attempt did not produce a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// The session store has never been set up.
    SessionMissing,
    /// The stored session no longer authenticates.
    SessionExpired,
    /// No item belongs to the supported retailer.
    NoEligibleItems,
    /// Every eligible item was skipped or failed to add.
    NothingAdded,
    /// The order-submission control could not be activated.
    ManualReview,
    /// Unexpected error; the attempt was abandoned.
    Aborted,
}

impl FailureKind {
    /// Failures an operator fixes by re-running session setup.
    pub fn is_session_failure(self) -> bool {
        matches!(self, FailureKind::SessionMissing | FailureKind::SessionExpired)
    }
}

/// Outcome of one fulfillment attempt. Built once, never mutated after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub total_cost: Decimal,
    pub shipping_cost: Decimal,
    pub markup: Decimal,
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    /// Diagnostic screenshot written during this attempt, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<PathBuf>,
}

impl OrderResult {
    pub fn placed(order_id: String, cost: CostBreakdown, logs: Vec<String>) -> Self {
        Self {
            success: true,
            order_id: Some(order_id),
            total_cost: cost.total,
            shipping_cost: cost.shipping,
            markup: cost.markup,
            logs,
            error: None,
            failure_kind: None,
            screenshot_path: None,
        }
    }

    /// Failed attempt with zeroed costs.
    pub fn failed(kind: FailureKind, error: impl Into<String>, logs: Vec<String>) -> Self {
        Self {
            success: false,
            order_id: None,
            total_cost: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            markup: Decimal::ZERO,
            logs,
            error: Some(error.into()),
            failure_kind: Some(kind),
            screenshot_path: None,
        }
    }

    /// Bag filled but not submitted; `total_cost` carries the bag subtotal.
    pub fn manual_review(
        subtotal: Decimal,
        error: impl Into<String>,
        screenshot_path: Option<PathBuf>,
        logs: Vec<String>,
    ) -> Self {
        Self {
            total_cost: subtotal,
            screenshot_path,
            ..Self::failed(FailureKind::ManualReview, error, logs)
        }
    }

    pub fn with_screenshot(mut self, path: Option<PathBuf>) -> Self {
        self.screenshot_path = path;
        self
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
