//! # GlowUp API
//!
//! HTTP surface over the fulfillment engine.
//!
//! ```text
//! POST /api/orders                               place an order
//! POST /api/orders/setup-session                 supervised retailer login
//! GET  /api/orders/session-status                stored session probe
//! GET  /api/orders/{order_id}/tracking           tracking record
//! GET  /api/orders/user/{user_id}/latest-tracking
//! GET  /health
//! ```
//!
//! Order attempts hold the request open until the engine returns; tracking
//! records live in memory for the life of the process.

pub mod error;
pub mod http;
pub mod server;
pub mod state;
pub mod tracking;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::ApiServer;
pub use state::AppState;
pub use tracking::{TrackingEvent, TrackingRecord, TrackingStatus, TrackingStore};
