use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Exclusive, time-boxed claim on one (product, date, start_time) slot.
/// Expiry is advisory: it is only enforced lazily by the next competing
/// hold attempt. Rows are never deleted.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingSlotHold {
    pub id: String,
    pub booking_request_id: String,
    pub product_id: String,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl BookingSlotHold {
    pub fn new(
        booking_request_id: String,
        product_id: String,
        event_date: NaiveDate,
        start_time: String,
        end_time: String,
        hold_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            booking_request_id,
            product_id,
            event_date,
            start_time,
            end_time,
            status: "ACTIVE".to_string(),
            expires_at: now + Duration::minutes(hold_minutes),
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
