use std::collections::BTreeMap;
use serde::Serialize;
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::services::availability::DayAvailability;

#[derive(Serialize)]
pub struct MonthAvailabilityResponse {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<String, DayAvailability>,
}

#[derive(Serialize)]
pub struct PresetResultResponse {
    pub applied: u32,
    pub skipped: u32,
}

#[derive(Serialize)]
pub struct BookingRequestResponse {
    pub id: String,
    pub event_date: NaiveDate,
    pub stage: String,
    pub availability_version: String,
    pub offer_expires_at: DateTime<Utc>,
    pub selected_time: Option<String>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub version: String,
    pub slots: Vec<String>,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub hold_id: String,
    pub hold_expires_at: DateTime<Utc>,
}
