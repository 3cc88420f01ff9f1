//! Storefront profile: URLs plus the locator chains for every UI action.

use glowup_config::RetailerConfig;

use crate::strategy::FallbackChain;

/// Locator chains for one address field.
#[derive(Debug, Clone)]
pub struct AddressFieldChains {
    pub first_name: FallbackChain,
    pub last_name: FallbackChain,
    pub line1: FallbackChain,
    pub line2: FallbackChain,
    pub city: FallbackChain,
    pub zip: FallbackChain,
    /// A `<select>` control.
    pub state: FallbackChain,
}

/// Everything the engine knows about the supported retailer.
#[derive(Debug, Clone)]
pub struct RetailerProfile {
    pub name: String,
    pub domain: String,
    pub home_url: String,
    pub cart_url: String,
    pub login_url: String,
    pub account_url: String,
    pub session_probe_url: String,
    pub order_history_url: String,
    pub default_country: String,

    pub sign_in: FallbackChain,
    pub cart_remove: FallbackChain,
    pub quantity: FallbackChain,
    pub add_to_bag: FallbackChain,
    pub checkout: FallbackChain,
    pub address: AddressFieldChains,
    pub shipping_continue: FallbackChain,
    pub place_order: FallbackChain,
}

/// `#shipping-<id>`, then the bare and `shipping.`-prefixed `name` forms.
fn shipping_input(name: &str, id: &str, tag: &str) -> FallbackChain {
    FallbackChain::new(format!("shipping {}", id))
        .then_css(&format!("#shipping-{}", id))
        .then_css(&format!("{}[name=\"{}\"]", tag, name))
        .then_css(&format!("{}[name=\"shipping.{}\"]", tag, name))
}

impl RetailerProfile {
    /// Profile for the configured storefront with its known markup.
    pub fn from_config(config: &RetailerConfig) -> Self {
        Self {
            name: config.name.clone(),
            domain: config.domain.clone(),
            home_url: config.home_url.clone(),
            cart_url: config.cart_url.clone(),
            login_url: config.login_url.clone(),
            account_url: config.account_url.clone(),
            session_probe_url: config.session_probe_url.clone(),
            order_history_url: config.order_history_url.clone(),
            default_country: config.default_country.clone(),

            sign_in: FallbackChain::of_css(
                "sign in",
                &["a[href*=\"login\"]", "a[href*=\"sign-in\"]", "a[href*=\"myaccount\"]"],
            )
            .then_text(&["button"], "Sign In")
            .then_text(&["a"], "Sign In")
            .then_text(&["a"], "Account"),

            cart_remove: FallbackChain::of_css(
                "remove from bag",
                &[
                    "[data-test=\"bag-item-remove\"]",
                    ".js-remove-product",
                    "button[aria-label*=\"Remove\"]",
                ],
            ),

            quantity: FallbackChain::of_css(
                "quantity",
                &[
                    "select[data-test=\"item-quantity\"]",
                    "select.js-quantity",
                    "select[name=\"quantity\"]",
                ],
            ),

            add_to_bag: FallbackChain::of_css(
                "add to bag",
                &[
                    "button[data-test=\"add-to-bag\"]",
                    "button#add-to-bag",
                    "button.ProductDetail__addToCart",
                    "button[aria-label*=\"Add to bag\"]",
                    "button[aria-label*=\"Add to Bag\"]",
                    "button.js-add-to-bag",
                    "button.ProductHero__addToCart",
                ],
            )
            .then_text(&["button"], "add to bag"),

            checkout: FallbackChain::of_css(
                "checkout",
                &[
                    "button[data-test=\"checkout-button\"]",
                    "a[data-test=\"checkout-button\"]",
                    "button.js-checkout",
                    "a.js-checkout",
                    "a[href*=\"checkout\"]",
                    "button[aria-label*=\"Checkout\"]",
                ],
            )
            .then_text_excluding(&["a", "button"], "checkout", "guest"),

            address: AddressFieldChains {
                first_name: shipping_input("firstName", "firstName", "input"),
                last_name: shipping_input("lastName", "lastName", "input"),
                line1: shipping_input("address1", "address1", "input"),
                line2: shipping_input("address2", "address2", "input"),
                city: shipping_input("city", "city", "input"),
                zip: shipping_input("postalCode", "zip", "input"),
                state: shipping_input("state", "state", "select"),
            },

            shipping_continue: FallbackChain::of_css(
                "shipping continue",
                &[
                    "button[data-test=\"shipping-continue\"]",
                    "button.js-continue-shipping",
                    "button[type=\"submit\"]",
                ],
            ),

            place_order: FallbackChain::of_css(
                "place order",
                &[
                    "button[data-test=\"place-order\"]",
                    "button.js-place-order",
                    "button[aria-label*=\"Place Order\"]",
                    "button[aria-label*=\"Place order\"]",
                    "#place-order",
                ],
            )
            .then_text(&["button"], "place order"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Locator;

    #[test]
    fn test_profile_urls_follow_config() {
        let mut config = RetailerConfig::default();
        config.cart_url = "https://staging.ulta.com/bag".to_string();
        let profile = RetailerProfile::from_config(&config);
        assert_eq!(profile.cart_url, "https://staging.ulta.com/bag");
        assert_eq!(profile.domain, "ulta.com");
    }

    #[test]
    fn test_heuristics_come_last() {
        let profile = RetailerProfile::from_config(&RetailerConfig::default());
        for chain in [&profile.add_to_bag, &profile.checkout, &profile.place_order] {
            let last = chain.locators().last().unwrap();
            assert!(last.is_heuristic(), "{} should end with a text fallback", chain.name());
            assert!(
                chain.locators()[..chain.locators().len() - 1]
                    .iter()
                    .all(|l| !l.is_heuristic())
            );
        }
        assert_eq!(profile.add_to_bag.locators().len(), 8);
        assert_eq!(profile.place_order.locators().len(), 6);
    }

    #[test]
    fn test_checkout_heuristic_excludes_guest() {
        let profile = RetailerProfile::from_config(&RetailerConfig::default());
        match profile.checkout.locators().last().unwrap() {
            Locator::Text(m) => {
                assert!(m.accepts("a", "Checkout", false));
                assert!(!m.accepts("button", "Guest Checkout", false));
            }
            other => panic!("unexpected locator {other}"),
        }
    }

    #[test]
    fn test_shipping_field_chains() {
        let profile = RetailerProfile::from_config(&RetailerConfig::default());
        assert_eq!(
            profile.address.zip.locators(),
            [
                Locator::css("#shipping-zip"),
                Locator::css("input[name=\"postalCode\"]"),
                Locator::css("input[name=\"shipping.postalCode\"]"),
            ]
        );
        assert_eq!(
            profile.address.state.locators()[1],
            Locator::css("select[name=\"state\"]")
        );
    }
}
