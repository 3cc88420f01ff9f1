//! # GlowUp Config
//!
//! Configuration for the fulfillment engine, the browser driver and the
//! HTTP surface. Every tunable the engine reads (pricing policy, timeouts,
//! settle delays, retailer endpoints) lives here so tests can construct
//! boundary values without touching shared state.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
