use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Permanent reservation record. Written only by the payment completion
/// handler after a verified paid event; immutable afterwards apart from
/// status transitions outside this subsystem.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub booking_request_id: Option<String>,
    pub product_id: Option<String>,
    pub campaign_id: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub checkout_session_id: String,
    pub payment_intent: Option<String>,
    pub amount_paid_cents: i64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub booking_request_id: Option<String>,
    pub product_id: Option<String>,
    pub campaign_id: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub checkout_session_id: String,
    pub payment_intent: Option<String>,
    pub amount_paid_cents: i64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: String,
    pub user_id: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_request_id: params.booking_request_id,
            product_id: params.product_id,
            campaign_id: params.campaign_id,
            event_date: params.event_date,
            start_time: params.start_time,
            end_time: params.end_time,
            status: "CONFIRMED".to_string(),
            checkout_session_id: params.checkout_session_id,
            payment_intent: params.payment_intent,
            amount_paid_cents: params.amount_paid_cents,
            currency: params.currency,
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            user_id: params.user_id,
            created_at: Utc::now(),
        }
    }
}
