use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Metadata round-tripped through the payment gateway: attached to the
/// checkout session and returned verbatim on the completion webhook.
/// Gateway metadata is string-typed on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CheckoutMetadata {
    pub booking_request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    pub event_date: String,
    pub selected_time: String,
    pub hold_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,
}

pub struct CheckoutSessionParams {
    pub product_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub stripe_price_id: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub expires_at: DateTime<Utc>,
    pub metadata: CheckoutMetadata,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}
