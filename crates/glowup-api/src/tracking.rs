//! In-memory order tracking.
//!
//! A record is opened under a provisional `pending-…` id when an order
//! request arrives and re-keyed to the retailer order id once the attempt
//! succeeds. Records are per process and not persisted.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ESTIMATED_DELIVERY_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Queued,
    AgentProcessing,
    Placed,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub status: TrackingStatus,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRecord {
    pub order_id: String,
    pub user_id: String,
    pub retailer: String,
    pub status: TrackingStatus,
    pub tracking_url: String,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub events: Vec<TrackingEvent>,
    pub updated_at: DateTime<Utc>,
}

impl TrackingRecord {
    fn push(&mut self, status: TrackingStatus, message: impl Into<String>) {
        let at = Utc::now();
        self.status = status;
        self.updated_at = at;
        self.events.push(TrackingEvent {
            status,
            message: message.into(),
            at,
        });
    }
}

/// Tracking records keyed by order id, plus each user's latest order.
#[derive(Debug, Default)]
pub struct TrackingStore {
    records: DashMap<String, TrackingRecord>,
    latest_by_user: DashMap<String, String>,
}

impl TrackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a record for an incoming order and mark it in progress.
    /// Returns the provisional id.
    pub fn open(&self, user_id: &str, retailer: &str, tracking_url: &str) -> String {
        let now = Utc::now();
        let attempt = Uuid::new_v4().simple().to_string();
        let pending_id = format!("pending-{}-{}", now.timestamp_millis(), &attempt[..8]);

        let mut record = TrackingRecord {
            order_id: pending_id.clone(),
            user_id: user_id.to_string(),
            retailer: retailer.to_string(),
            status: TrackingStatus::Queued,
            tracking_url: tracking_url.to_string(),
            estimated_delivery: None,
            events: vec![TrackingEvent {
                status: TrackingStatus::Queued,
                message: "Order request received by GlowUp agents.".to_string(),
                at: now,
            }],
            updated_at: now,
        };
        record.push(
            TrackingStatus::AgentProcessing,
            format!("{} agent is adding products and proceeding through checkout.", retailer),
        );

        self.records.insert(pending_id.clone(), record);
        self.latest_by_user
            .insert(user_id.to_string(), pending_id.clone());
        pending_id
    }

    /// Move the pending record to the final order id with placed and
    /// confirmed events.
    pub fn confirm(&self, pending_id: &str, order_id: &str) -> Option<TrackingRecord> {
        let (_, mut record) = self.records.remove(pending_id)?;
        record.order_id = order_id.to_string();
        record.estimated_delivery = Some(Utc::now() + Duration::days(ESTIMATED_DELIVERY_DAYS));
        record.push(
            TrackingStatus::Placed,
            format!("Order placed on {} checkout.", record.retailer),
        );
        record.push(
            TrackingStatus::Confirmed,
            format!("{} confirmed order {}.", record.retailer, order_id),
        );

        self.latest_by_user
            .insert(record.user_id.clone(), order_id.to_string());
        self.records.insert(order_id.to_string(), record.clone());
        Some(record)
    }

    /// Append a failure event to the pending record.
    pub fn fail(&self, pending_id: &str, message: &str) {
        if let Some(mut record) = self.records.get_mut(pending_id) {
            record.push(TrackingStatus::Failed, message);
        }
    }

    pub fn get(&self, order_id: &str) -> Option<TrackingRecord> {
        self.records.get(order_id).map(|r| r.clone())
    }

    pub fn latest_for_user(&self, user_id: &str) -> Option<TrackingRecord> {
        let order_id = self.latest_by_user.get(user_id)?.clone();
        self.get(&order_id)
    }
}
