use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Date-specific exception that supersedes the rule. Exactly one of the
/// two forms is populated: `date` for a whole-day override, or
/// `start_at`/`end_at` for a partial-day range.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityOverride {
    pub id: String,
    pub product_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: String,
    pub capacity_override: Option<i32>,
    pub reason: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityOverride {
    pub fn whole_day(
        product_id: Option<String>,
        date: NaiveDate,
        status: String,
        capacity_override: Option<i32>,
        created_by: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id,
            date: Some(date),
            start_at: None,
            end_at: None,
            status,
            capacity_override,
            reason: None,
            created_by,
            created_at: Utc::now(),
        }
    }
}

pub const OVERRIDE_STATUSES: [&str; 4] = ["AVAILABLE", "LIMITED", "FULL", "BLOCKED"];
