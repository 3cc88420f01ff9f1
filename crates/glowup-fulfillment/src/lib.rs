//! # GlowUp Fulfillment
//!
//! Places orders on the supported retailer by driving a browser through a
//! stored, operator-established login.
//!
//! ## Layers
//!
//! - [`session`]: on-disk session store, supervised setup and validity probe
//! - [`strategy`]: selector fallback chains for every UI action
//! - [`signals`]: page-text detectors behind one swappable trait
//! - [`checkout`]: the seven-stage checkout state machine
//! - [`engine`]: the per-order orchestrator returning an [`OrderResult`]

pub mod checkout;
pub mod cost;
pub mod engine;
pub mod error;
pub mod log;
pub mod model;
pub mod partition;
pub mod retailer;
pub mod session;
pub mod signals;
pub mod strategy;

#[cfg(test)]
pub(crate) mod testing;

pub use checkout::{CheckoutOutcome, CheckoutStage, StageError};
pub use cost::CostBreakdown;
pub use engine::{FulfillmentEngine, fallback_order_id};
pub use error::{CheckoutError, RequestError, SessionError};
pub use model::{FailureKind, OrderItem, OrderRequest, OrderResult, ShippingAddress};
pub use retailer::RetailerProfile;
pub use session::{SessionMarker, SessionStore, SessionSupervisor, SetupOutcome};
pub use signals::{SignalDetector, TextSignals};
pub use strategy::{Action, ChainOutcome, FallbackChain, Locator};
