use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Slot offer configuration, stored as JSON on the product row.
/// `limited_slots` is the curated fallback list shown once the offer
/// window has lapsed; the full window is sliced into slots on demand.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BookingConfig {
    pub limited_slots: Vec<String>,
    pub full_window_start: String,
    pub full_window_end: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            limited_slots: vec!["16:00".to_string(), "17:00".to_string(), "18:00".to_string()],
            full_window_start: "09:00".to_string(),
            full_window_end: "19:00".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Product {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub stripe_price_id: Option<String>,
    pub slot_duration_min: i32,
    pub offer_window_hours: i32,
    pub booking_config_json: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewProductParams {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub stripe_price_id: Option<String>,
    pub slot_duration_min: i32,
    pub offer_window_hours: i32,
    pub booking_config: BookingConfig,
}

impl Product {
    pub fn new(params: NewProductParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            slug: params.slug,
            name: params.name,
            description: params.description,
            price_cents: params.price_cents,
            currency: params.currency,
            stripe_price_id: params.stripe_price_id,
            slot_duration_min: params.slot_duration_min,
            offer_window_hours: params.offer_window_hours,
            booking_config_json: serde_json::to_string(&params.booking_config).unwrap_or_else(|_| "{}".to_string()),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn booking_config(&self) -> BookingConfig {
        serde_json::from_str(&self.booking_config_json).unwrap_or_default()
    }
}
