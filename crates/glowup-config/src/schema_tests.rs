use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.retailer.domain, "ulta.com");
    assert!(config.browser.headless);
}

#[test]
fn test_pricing_defaults_match_service_policy() {
    let pricing = PricingConfig::default();
    assert_eq!(pricing.markup_rate, dec!(0.15));
    assert_eq!(pricing.free_shipping_threshold, dec!(35));
    assert_eq!(pricing.flat_shipping_fee, dec!(5.95));
}

#[test]
fn test_timing_defaults() {
    let timing = TimingConfig::default();
    assert_eq!(timing.navigation_timeout(), Duration::from_secs(30));
    assert_eq!(timing.checkout_settle(), Duration::from_millis(2_500));
    assert_eq!(timing.ui_settle(), Duration::from_millis(800));
    assert_eq!(timing.max_cart_clear_iterations, 10);
    assert_eq!(timing.setup_poll_interval(), Duration::from_secs(2));
    assert_eq!(timing.setup_timeout(), Duration::from_secs(180));
}

#[test]
fn test_timing_immediate_zeroes_settles_only() {
    let timing = TimingConfig::immediate();
    assert_eq!(timing.ui_settle(), Duration::ZERO);
    assert_eq!(timing.checkout_settle(), Duration::ZERO);
    assert_eq!(timing.confirmation_timeout(), Duration::ZERO);
    assert_eq!(timing.navigation_timeout(), Duration::from_secs(30));
    assert_eq!(timing.max_cart_clear_iterations, 10);
    assert_eq!(timing.setup_timeout(), Duration::from_secs(180));
}

#[test]
fn test_diagnostics_paths() {
    let diagnostics = DiagnosticsConfig {
        dir: PathBuf::from("/tmp/glowup-diag"),
    };
    assert_eq!(
        diagnostics.checkout_debug_screenshot(),
        PathBuf::from("/tmp/glowup-diag/checkout-debug.png")
    );
    assert_eq!(
        diagnostics.error_screenshot(),
        PathBuf::from("/tmp/glowup-diag/checkout-error.png")
    );
}

#[test]
fn test_session_dir_under_glowup_home() {
    let session = SessionConfig::default();
    assert!(session.dir.ends_with(".glowup/browser-session"));
}

#[test]
fn test_config_roundtrips_through_toml() {
    let config = Config::default();
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("[retailer]"));
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.retailer.cart_url, config.retailer.cart_url);
    assert_eq!(parsed.pricing.flat_shipping_fee, config.pricing.flat_shipping_fee);
}
