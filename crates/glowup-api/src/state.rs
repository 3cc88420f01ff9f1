//! Application state.

use std::sync::Arc;

use glowup_fulfillment::FulfillmentEngine;

use crate::tracking::TrackingStore;

/// State shared across handlers.
pub struct AppState {
    pub engine: Arc<FulfillmentEngine>,
    pub tracking: TrackingStore,
}

impl AppState {
    pub fn new(engine: Arc<FulfillmentEngine>) -> Self {
        Self {
            engine,
            tracking: TrackingStore::new(),
        }
    }
}
