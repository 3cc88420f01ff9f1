//! Configuration validation.

use rust_decimal::Decimal;
use url::Url;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into the first error, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_retailer(config, &mut result);
        Self::validate_pricing(config, &mut result);
        Self::validate_timing(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }

        if config.browser.debug_port == config.server.port {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Chrome debug port collides with the server port",
            ));
        }
    }

    fn validate_retailer(config: &Config, result: &mut ValidationResult) {
        let retailer = &config.retailer;

        if retailer.domain.trim().is_empty() {
            result.add_error(ValidationError::new(
                "retailer.domain",
                "Retailer domain cannot be empty",
            ));
        }

        let urls = [
            ("retailer.home_url", &retailer.home_url),
            ("retailer.cart_url", &retailer.cart_url),
            ("retailer.login_url", &retailer.login_url),
            ("retailer.account_url", &retailer.account_url),
            ("retailer.session_probe_url", &retailer.session_probe_url),
            ("retailer.order_history_url", &retailer.order_history_url),
        ];

        for (path, value) in urls {
            match Url::parse(value) {
                Ok(url) => {
                    let on_domain = url
                        .host_str()
                        .is_some_and(|host| host == retailer.domain || host.ends_with(&format!(".{}", retailer.domain)));
                    if !on_domain {
                        result.add_warning(ValidationWarning::new(
                            path,
                            format!("URL is not on the retailer domain '{}'", retailer.domain),
                        ));
                    }
                }
                Err(e) => {
                    result.add_error(ValidationError::new(path, format!("Invalid URL: {}", e)));
                }
            }
        }
    }

    fn validate_pricing(config: &Config, result: &mut ValidationResult) {
        let pricing = &config.pricing;

        if pricing.markup_rate < Decimal::ZERO || pricing.markup_rate >= Decimal::ONE {
            result.add_error(ValidationError::new(
                "pricing.markup_rate",
                "markup_rate must be in [0, 1)",
            ));
        }

        if pricing.free_shipping_threshold < Decimal::ZERO {
            result.add_error(ValidationError::new(
                "pricing.free_shipping_threshold",
                "free_shipping_threshold cannot be negative",
            ));
        }

        if pricing.flat_shipping_fee < Decimal::ZERO {
            result.add_error(ValidationError::new(
                "pricing.flat_shipping_fee",
                "flat_shipping_fee cannot be negative",
            ));
        }
    }

    fn validate_timing(config: &Config, result: &mut ValidationResult) {
        let timing = &config.timing;

        if timing.navigation_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "timing.navigation_timeout_ms",
                "navigation_timeout_ms must be greater than 0",
            ));
        }

        if timing.setup_poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "timing.setup_poll_interval_ms",
                "setup_poll_interval_ms must be greater than 0",
            ));
        } else if timing.setup_poll_interval_ms >= timing.setup_timeout_ms {
            result.add_error(ValidationError::new(
                "timing.setup_poll_interval_ms",
                "setup_poll_interval_ms must be shorter than setup_timeout_ms",
            ));
        }

        if timing.max_cart_clear_iterations == 0 {
            result.add_warning(ValidationWarning::new(
                "timing.max_cart_clear_iterations",
                "Cart clearing is disabled; stale bag contents will be checked out",
            ));
        }

        if timing.max_cart_clear_iterations > 100 {
            result.add_warning(ValidationWarning::new(
                "timing.max_cart_clear_iterations",
                "max_cart_clear_iterations is very high (>100)",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
