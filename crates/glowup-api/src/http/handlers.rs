//! Order, session and tracking handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use glowup_fulfillment::{FailureKind, OrderRequest, OrderResult, SetupOutcome};

use crate::error::ApiError;
use crate::state::AppState;
use crate::tracking::{TrackingRecord, TrackingStatus};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Tracking summary returned with a placed order.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSummary {
    pub status: TrackingStatus,
    pub tracking_url: String,
    pub estimated_delivery: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&TrackingRecord> for TrackingSummary {
    fn from(record: &TrackingRecord) -> Self {
        Self {
            status: record.status,
            tracking_url: record.tracking_url.clone(),
            estimated_delivery: record.estimated_delivery,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    pub success: bool,
    pub order_id: String,
    pub tracking: TrackingSummary,
    pub result: OrderResult,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFailedResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    pub logs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackingResponse {
    pub success: bool,
    pub tracking: TrackingRecord,
}

/// Status code for an unsuccessful attempt.
///
/// No eligible items is a caller bug, session failures need an operator,
/// everything else is a failed checkout.
pub fn failure_status(kind: Option<FailureKind>) -> StatusCode {
    match kind {
        Some(FailureKind::NoEligibleItems) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(kind) if kind.is_session_failure() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Run one fulfillment attempt.
///
/// POST /api/orders
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrderRequest>,
) -> Result<Response, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    info!(
        "Received order request for user {}: {} item(s), shipping to {}",
        request.user_id,
        request.items.len(),
        if request.shipping_address.city.is_empty() {
            "unknown"
        } else {
            request.shipping_address.city.as_str()
        }
    );

    let retailer = state.engine.retailer();
    let pending_id = state
        .tracking
        .open(&request.user_id, &retailer.name, &retailer.order_history_url);

    let result = state.engine.process_order(&request).await;

    if result.success {
        let order_id = result.order_id.clone().unwrap_or_else(|| pending_id.clone());
        info!("Order placed: {}", order_id);
        let tracking = match state.tracking.confirm(&pending_id, &order_id) {
            Some(record) => TrackingSummary::from(&record),
            None => TrackingSummary {
                status: TrackingStatus::Confirmed,
                tracking_url: retailer.order_history_url.clone(),
                estimated_delivery: None,
            },
        };
        let body = OrderPlacedResponse {
            success: true,
            order_id,
            tracking,
            result,
        };
        return Ok((StatusCode::OK, Json(body)).into_response());
    }

    let error = result
        .error
        .clone()
        .unwrap_or_else(|| "Checkout failed before confirmation.".to_string());
    warn!("Order failed: {}", error);
    state.tracking.fail(&pending_id, &error);

    let status = failure_status(result.failure_kind);
    let body = OrderFailedResponse {
        success: false,
        error,
        failure_kind: result.failure_kind,
        logs: result.logs,
    };
    Ok((status, Json(body)).into_response())
}

/// Open a visible browser for the operator to sign in.
///
/// POST /api/orders/setup-session
pub async fn setup_session(State(state): State<Arc<AppState>>) -> Json<SetupOutcome> {
    info!("Starting {} session setup", state.engine.retailer().name);
    Json(state.engine.setup_session().await)
}

/// GET /api/orders/session-status
pub async fn session_status(State(state): State<Arc<AppState>>) -> Json<SessionStatusResponse> {
    let valid = state.engine.is_session_valid().await;
    let message = if valid {
        "Session active"
    } else {
        "Session expired or not set up"
    };
    Json(SessionStatusResponse {
        valid,
        message: message.to_string(),
    })
}

/// GET /api/orders/{order_id}/tracking
pub async fn order_tracking(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<TrackingResponse>, ApiError> {
    let tracking = state
        .tracking
        .get(&order_id)
        .ok_or_else(|| ApiError::NotFound("Tracking not found".to_string()))?;
    Ok(Json(TrackingResponse {
        success: true,
        tracking,
    }))
}

/// GET /api/orders/user/{user_id}/latest-tracking
pub async fn latest_tracking(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<TrackingResponse>, ApiError> {
    let tracking = state
        .tracking
        .latest_for_user(&user_id)
        .ok_or_else(|| ApiError::NotFound("No tracked order found".to_string()))?;
    Ok(Json(TrackingResponse {
        success: true,
        tracking,
    }))
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
