//! Page-text detectors.
//!
//! Every judgement the engine makes from scraped page content goes through
//! [`SignalDetector`], so the state machine can run against fake detectors
//! and the pattern lists can change without touching the stages.

use std::sync::LazyLock;

use regex::Regex;

use glowup_browser::PageSnapshot;

static ORDER_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    // Only the label is case-insensitive. The id is a whole uppercase or
    // numeric token holding a digit, so prose such as "Order confirmation
    // sent to jane2@..." is not mistaken for one.
    Regex::new(r"(?i:order\s*(?:number|#|confirmation))[:\s]*([A-Z0-9-]*\d[A-Z0-9-]*)\b")
        .expect("valid order number pattern")
});

static CONFIRMATION_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)order|confirmation|thank-you").expect("valid confirmation url pattern")
});

/// Named predicates and extractors over rendered page state.
pub trait SignalDetector: Send + Sync {
    /// Home page shows a signed-in identity.
    fn is_authenticated(&self, page: &PageSnapshot) -> bool;

    /// Product page reports the item unavailable.
    fn is_out_of_stock(&self, page: &PageSnapshot) -> bool;

    /// Checkout already offers an address on file.
    fn has_saved_address(&self, page: &PageSnapshot) -> bool;

    /// Checkout shows a stored payment instrument.
    fn has_saved_payment(&self, page: &PageSnapshot) -> bool;

    /// Retailer order number from a confirmation page.
    fn extract_order_number(&self, page: &PageSnapshot) -> Option<String>;

    /// URL looks like a post-submission page.
    fn is_confirmation_url(&self, url: &str) -> bool;

    /// Storefront is serving a maintenance page.
    fn is_maintenance(&self, page: &PageSnapshot) -> bool;

    /// Operator finished signing in during session setup.
    fn is_login_complete(&self, page: &PageSnapshot) -> bool;

    /// URL is the retailer's sign-in form.
    fn is_login_url(&self, url: &str) -> bool;

    /// Account page content proves the stored session still works.
    fn is_account_page(&self, page: &PageSnapshot) -> bool;
}

/// Marker-list detector tuned for the supported storefront.
#[derive(Debug, Clone)]
pub struct TextSignals {
    /// Case-sensitive markers on the home page.
    pub authenticated: Vec<String>,
    /// Lowercase stock markers.
    pub out_of_stock: Vec<String>,
    pub saved_address: Vec<String>,
    pub saved_payment: Vec<String>,
    /// Lowercase maintenance markers.
    pub maintenance: Vec<String>,
    /// Lowercase markers of a signed-in page seen during setup.
    pub logged_in_text: Vec<String>,
    /// Lowercase markers of a sign-in form.
    pub login_prompt: Vec<String>,
    /// Case-sensitive markers on the account page.
    pub account_page: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for TextSignals {
    fn default() -> Self {
        Self {
            authenticated: strings(&["Sign Out", "Hi,"]),
            out_of_stock: strings(&["out of stock", "sold out"]),
            saved_address: strings(&["Ship to this address", "Selected shipping address"]),
            saved_payment: strings(&["ending in", "****", "Visa", "Mastercard", "American Express"]),
            maintenance: strings(&["will be back shortly", "maintenance", "temporarily unavailable"]),
            logged_in_text: strings(&["sign out", "my account", "myaccount", "hi,", "hi ", "order history"]),
            login_prompt: strings(&["sign in", "log in"]),
            account_page: strings(&["Sign Out", "My Account", "Order History"]),
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

impl TextSignals {
    fn is_account_url(url: &str) -> bool {
        let url = url.to_lowercase();
        url.contains("/myaccount") || (url.contains("/account") && !url.contains("/login"))
    }
}

impl SignalDetector for TextSignals {
    fn is_authenticated(&self, page: &PageSnapshot) -> bool {
        contains_any(&page.text, &self.authenticated)
    }

    fn is_out_of_stock(&self, page: &PageSnapshot) -> bool {
        contains_any(&page.text.to_lowercase(), &self.out_of_stock)
    }

    fn has_saved_address(&self, page: &PageSnapshot) -> bool {
        contains_any(&page.text, &self.saved_address)
    }

    fn has_saved_payment(&self, page: &PageSnapshot) -> bool {
        contains_any(&page.text, &self.saved_payment)
    }

    fn extract_order_number(&self, page: &PageSnapshot) -> Option<String> {
        ORDER_NUMBER
            .captures(&page.text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn is_confirmation_url(&self, url: &str) -> bool {
        CONFIRMATION_URL.is_match(url)
    }

    fn is_maintenance(&self, page: &PageSnapshot) -> bool {
        contains_any(&page.text.to_lowercase(), &self.maintenance)
    }

    fn is_login_complete(&self, page: &PageSnapshot) -> bool {
        let text = page.text.to_lowercase();
        let title = page.title.to_lowercase();

        let url_logged_in = Self::is_account_url(&page.url);
        let text_logged_in = contains_any(&text, &self.logged_in_text);

        let shows_prompt = contains_any(&text, &self.login_prompt)
            || title.contains("login")
            || title.contains("sign in");
        let on_login_page = self.is_login_url(&page.url) || (shows_prompt && !url_logged_in);

        (url_logged_in || text_logged_in) && !on_login_page
    }

    fn is_login_url(&self, url: &str) -> bool {
        url.to_lowercase().contains("/login")
    }

    fn is_account_page(&self, page: &PageSnapshot) -> bool {
        contains_any(&page.text, &self.account_page)
    }
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
