use super::*;
use rust_decimal_macros::dec;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid(), "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

#[test]
fn test_validate_invalid_port() {
    let mut config = Config::default();
    config.server.port = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "server.port"));
}

#[test]
fn test_validate_debug_port_collision() {
    let mut config = Config::default();
    config.browser.debug_port = config.server.port;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "browser.debug_port"));
}

#[test]
fn test_validate_markup_rate_bounds() {
    let mut config = Config::default();
    config.pricing.markup_rate = dec!(1);
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "pricing.markup_rate"));

    config.pricing.markup_rate = dec!(-0.01);
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "pricing.markup_rate"));

    config.pricing.markup_rate = dec!(0);
    assert!(ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_validate_negative_money() {
    let mut config = Config::default();
    config.pricing.flat_shipping_fee = dec!(-1);
    config.pricing.free_shipping_threshold = dec!(-5);

    let result = ConfigValidator::validate(&config);
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_validate_empty_domain() {
    let mut config = Config::default();
    config.retailer.domain = "  ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "retailer.domain"));
}

#[test]
fn test_validate_bad_retailer_url() {
    let mut config = Config::default();
    config.retailer.cart_url = "not a url".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "retailer.cart_url"));
}

#[test]
fn test_validate_off_domain_url_warns() {
    let mut config = Config::default();
    config.retailer.login_url = "https://login.example.org/".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "retailer.login_url"));
}

#[test]
fn test_validate_poll_interval() {
    let mut config = Config::default();
    config.timing.setup_poll_interval_ms = 0;
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "timing.setup_poll_interval_ms"));

    config.timing.setup_poll_interval_ms = config.timing.setup_timeout_ms;
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "timing.setup_poll_interval_ms"));
}

#[test]
fn test_validate_cart_clear_disabled_warns() {
    let mut config = Config::default();
    config.timing.max_cart_clear_iterations = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_into_result_reports_first_error() {
    let mut config = Config::default();
    config.server.host.clear();

    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    assert!(err.to_string().contains("server.host"));
}
