use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use crate::domain::models::payment::CheckoutMetadata;
use crate::domain::models::product::BookingConfig;

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: Option<String>,
    pub stripe_price_id: Option<String>,
    pub slot_duration_min: Option<i32>,
    pub offer_window_hours: Option<i32>,
    pub booking_config: Option<BookingConfig>,
}

#[derive(Deserialize)]
pub struct UpsertRuleRequest {
    pub timezone: String,
    pub workdays: Vec<u8>,
    pub start_time: String,
    pub end_time: String,
    pub slot_minutes: i32,
    pub buffer_minutes: Option<i32>,
    pub capacity_type: Option<String>,
    pub daily_capacity: Option<i32>,
    pub slot_capacity: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct OverrideRequest {
    pub product_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: String,
    pub capacity_override: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct ListOverridesQuery {
    pub product_id: Option<String>,
    pub start: String,
    pub end: String,
}

#[derive(Deserialize)]
pub struct ApplyPresetRequest {
    pub preset: String,
    pub product_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub daily_capacity: Option<i32>,
}

#[derive(Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct StartBookingRequest {
    pub product_slug: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_card_index: Option<i32>,
    pub event_date: String,
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
pub struct SelectTimeRequest {
    pub time: String,
}

// Inbound webhook payload from the payment gateway.

#[derive(Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub object: CheckoutSessionObject,
}

#[derive(Deserialize)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    pub payment_status: String,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub payment_intent: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: CheckoutMetadata,
}
