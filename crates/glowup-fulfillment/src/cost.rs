//! Service fee and shipping policy applied on top of the bag subtotal.

use rust_decimal::Decimal;
use serde::Serialize;

use glowup_config::PricingConfig;

/// Customer-facing cost of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub markup: Decimal,
    pub total: Decimal,
}

impl CostBreakdown {
    pub fn compute(subtotal: Decimal, pricing: &PricingConfig) -> Self {
        let shipping = if subtotal >= pricing.free_shipping_threshold {
            Decimal::ZERO
        } else {
            pricing.flat_shipping_fee
        };
        let markup = subtotal * pricing.markup_rate;

        Self {
            subtotal,
            shipping,
            markup,
            total: subtotal + shipping + markup,
        }
    }

    /// Human-readable summary lines for the order log.
    pub fn summary_lines(&self) -> [String; 4] {
        let shipping = if self.shipping.is_zero() {
            "FREE".to_string()
        } else {
            format!("${}", money(self.shipping))
        };
        [
            format!("Subtotal: ${}", money(self.subtotal)),
            format!("Shipping: {}", shipping),
            format!("Service fee: ${}", money(self.markup)),
            format!("Total: ${}", money(self.total)),
        ]
    }
}

/// Two decimal places, banker's rounding.
fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
