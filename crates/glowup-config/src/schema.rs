//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub retailer: RetailerConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Browser driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Run order attempts and validity probes headless. The session setup
    /// flow always opens a visible window regardless of this flag.
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Explicit Chrome executable; autodetected when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: default_headless(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            chrome_path: None,
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_headless() -> bool {
    true
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    900
}

/// The one storefront this engine automates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerConfig {
    /// Human-readable name used in log lines.
    #[serde(default = "default_retailer_name")]
    pub name: String,

    /// Registrable domain; items whose URL host is this domain (or a
    /// subdomain of it) are eligible for automated fulfillment.
    #[serde(default = "default_retailer_domain")]
    pub domain: String,

    #[serde(default = "default_home_url")]
    pub home_url: String,

    #[serde(default = "default_cart_url")]
    pub cart_url: String,

    #[serde(default = "default_login_url")]
    pub login_url: String,

    #[serde(default = "default_account_url")]
    pub account_url: String,

    /// Page loaded by the session validity probe.
    #[serde(default = "default_session_probe_url")]
    pub session_probe_url: String,

    /// Link handed back to callers for order tracking.
    #[serde(default = "default_order_history_url")]
    pub order_history_url: String,

    #[serde(default = "default_country")]
    pub default_country: String,
}

impl Default for RetailerConfig {
    fn default() -> Self {
        Self {
            name: default_retailer_name(),
            domain: default_retailer_domain(),
            home_url: default_home_url(),
            cart_url: default_cart_url(),
            login_url: default_login_url(),
            account_url: default_account_url(),
            session_probe_url: default_session_probe_url(),
            order_history_url: default_order_history_url(),
            default_country: default_country(),
        }
    }
}

fn default_retailer_name() -> String {
    "Ulta".to_string()
}

fn default_retailer_domain() -> String {
    "ulta.com".to_string()
}

fn default_home_url() -> String {
    "https://www.ulta.com".to_string()
}

fn default_cart_url() -> String {
    "https://www.ulta.com/bag".to_string()
}

fn default_login_url() -> String {
    "https://www.ulta.com/u/login".to_string()
}

fn default_account_url() -> String {
    "https://www.ulta.com/myaccount".to_string()
}

fn default_session_probe_url() -> String {
    "https://www.ulta.com/ulta/myaccount/index.jsp".to_string()
}

fn default_order_history_url() -> String {
    "https://www.ulta.com/myaccount/orderhistory.jsp".to_string()
}

fn default_country() -> String {
    "US".to_string()
}

/// Margin and shipping policy layered on top of retailer line prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Service fee as a fraction of the subtotal.
    #[serde(default = "default_markup_rate")]
    pub markup_rate: Decimal,

    /// Subtotals at or above this amount ship free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: Decimal,

    #[serde(default = "default_flat_shipping_fee")]
    pub flat_shipping_fee: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            markup_rate: default_markup_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            flat_shipping_fee: default_flat_shipping_fee(),
        }
    }
}

fn default_markup_rate() -> Decimal {
    dec!(0.15)
}

fn default_free_shipping_threshold() -> Decimal {
    dec!(35)
}

fn default_flat_shipping_fee() -> Decimal {
    dec!(5.95)
}

/// Timeouts and settle delays, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    #[serde(default = "default_ui_settle_ms")]
    pub ui_settle_ms: u64,

    #[serde(default = "default_checkout_settle_ms")]
    pub checkout_settle_ms: u64,

    #[serde(default = "default_cart_remove_settle_ms")]
    pub cart_remove_settle_ms: u64,

    #[serde(default = "default_bag_update_settle_ms")]
    pub bag_update_settle_ms: u64,

    #[serde(default = "default_quantity_settle_ms")]
    pub quantity_settle_ms: u64,

    /// Upper bound on waiting for the confirmation page after placing.
    #[serde(default = "default_confirmation_timeout_ms")]
    pub confirmation_timeout_ms: u64,

    #[serde(default = "default_max_cart_clear_iterations")]
    pub max_cart_clear_iterations: u32,

    #[serde(default = "default_setup_poll_interval_ms")]
    pub setup_poll_interval_ms: u64,

    #[serde(default = "default_setup_timeout_ms")]
    pub setup_timeout_ms: u64,

    /// Pause after login is detected, before the account page check.
    #[serde(default = "default_setup_verify_settle_ms")]
    pub setup_verify_settle_ms: u64,

    /// Pause before reloading a maintenance page during setup.
    #[serde(default = "default_maintenance_retry_ms")]
    pub maintenance_retry_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: default_navigation_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            ui_settle_ms: default_ui_settle_ms(),
            checkout_settle_ms: default_checkout_settle_ms(),
            cart_remove_settle_ms: default_cart_remove_settle_ms(),
            bag_update_settle_ms: default_bag_update_settle_ms(),
            quantity_settle_ms: default_quantity_settle_ms(),
            confirmation_timeout_ms: default_confirmation_timeout_ms(),
            max_cart_clear_iterations: default_max_cart_clear_iterations(),
            setup_poll_interval_ms: default_setup_poll_interval_ms(),
            setup_timeout_ms: default_setup_timeout_ms(),
            setup_verify_settle_ms: default_setup_verify_settle_ms(),
            maintenance_retry_ms: default_maintenance_retry_ms(),
        }
    }
}

impl TimingConfig {
    /// All delays zeroed; used by tests that script the page directly.
    pub fn immediate() -> Self {
        Self {
            navigation_timeout_ms: default_navigation_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            ui_settle_ms: 0,
            checkout_settle_ms: 0,
            cart_remove_settle_ms: 0,
            bag_update_settle_ms: 0,
            quantity_settle_ms: 0,
            confirmation_timeout_ms: 0,
            setup_verify_settle_ms: 0,
            maintenance_retry_ms: 0,
            ..Self::default()
        }
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn ui_settle(&self) -> Duration {
        Duration::from_millis(self.ui_settle_ms)
    }

    pub fn checkout_settle(&self) -> Duration {
        Duration::from_millis(self.checkout_settle_ms)
    }

    pub fn cart_remove_settle(&self) -> Duration {
        Duration::from_millis(self.cart_remove_settle_ms)
    }

    pub fn bag_update_settle(&self) -> Duration {
        Duration::from_millis(self.bag_update_settle_ms)
    }

    pub fn quantity_settle(&self) -> Duration {
        Duration::from_millis(self.quantity_settle_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    pub fn setup_poll_interval(&self) -> Duration {
        Duration::from_millis(self.setup_poll_interval_ms)
    }

    pub fn setup_timeout(&self) -> Duration {
        Duration::from_millis(self.setup_timeout_ms)
    }

    pub fn setup_verify_settle(&self) -> Duration {
        Duration::from_millis(self.setup_verify_settle_ms)
    }

    pub fn maintenance_retry(&self) -> Duration {
        Duration::from_millis(self.maintenance_retry_ms)
    }
}

fn default_navigation_timeout_ms() -> u64 {
    30_000
}

fn default_probe_timeout_ms() -> u64 {
    20_000
}

fn default_ui_settle_ms() -> u64 {
    800
}

fn default_checkout_settle_ms() -> u64 {
    2_500
}

fn default_cart_remove_settle_ms() -> u64 {
    700
}

fn default_bag_update_settle_ms() -> u64 {
    1_000
}

fn default_quantity_settle_ms() -> u64 {
    500
}

fn default_confirmation_timeout_ms() -> u64 {
    8_000
}

fn default_max_cart_clear_iterations() -> u32 {
    10
}

fn default_setup_poll_interval_ms() -> u64 {
    2_000
}

fn default_setup_timeout_ms() -> u64 {
    180_000
}

fn default_setup_verify_settle_ms() -> u64 {
    3_000
}

fn default_maintenance_retry_ms() -> u64 {
    5_000
}

/// Session store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_dir")]
    pub dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: default_session_dir(),
        }
    }
}

fn default_session_dir() -> PathBuf {
    glowup_home().join("browser-session")
}

/// Where diagnostic screenshots are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_diagnostics_dir")]
    pub dir: PathBuf,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            dir: default_diagnostics_dir(),
        }
    }
}

impl DiagnosticsConfig {
    /// Screenshot captured when the place-order control cannot be activated.
    pub fn checkout_debug_screenshot(&self) -> PathBuf {
        self.dir.join("checkout-debug.png")
    }

    /// Screenshot captured when an attempt aborts on an unexpected error.
    pub fn error_screenshot(&self) -> PathBuf {
        self.dir.join("checkout-error.png")
    }
}

fn default_diagnostics_dir() -> PathBuf {
    glowup_home().join("diagnostics")
}

/// The `~/.glowup` directory.
pub fn glowup_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".glowup")
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
