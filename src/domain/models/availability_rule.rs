use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Weekday};
use sqlx::FromRow;
use uuid::Uuid;

/// Recurring weekly availability template. `product_id = None` is the
/// global rule; a product-scoped rule shadows it. `workdays_mask` uses
/// bit i for weekday i, 0 = Sunday through 6 = Saturday.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityRule {
    pub id: String,
    pub product_id: Option<String>,
    pub timezone: String,
    pub workdays_mask: i32,
    pub start_time: String,
    pub end_time: String,
    pub slot_minutes: i32,
    pub buffer_minutes: i32,
    pub capacity_type: String,
    pub daily_capacity: i32,
    pub slot_capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewRuleParams {
    pub product_id: Option<String>,
    pub timezone: String,
    pub workdays_mask: i32,
    pub start_time: String,
    pub end_time: String,
    pub slot_minutes: i32,
    pub buffer_minutes: i32,
    pub capacity_type: String,
    pub daily_capacity: i32,
    pub slot_capacity: i32,
}

impl AvailabilityRule {
    pub fn new(params: NewRuleParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id: params.product_id,
            timezone: params.timezone,
            workdays_mask: params.workdays_mask,
            start_time: params.start_time,
            end_time: params.end_time,
            slot_minutes: params.slot_minutes,
            buffer_minutes: params.buffer_minutes,
            capacity_type: params.capacity_type,
            daily_capacity: params.daily_capacity,
            slot_capacity: params.slot_capacity,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_workday(&self, weekday: Weekday) -> bool {
        self.workdays_mask & (1 << weekday.num_days_from_sunday()) != 0
    }

    /// Total bookable capacity for one day under this rule.
    pub fn day_capacity(&self) -> i32 {
        if self.capacity_type == "PER_SLOT" {
            self.slot_capacity * self.slots_per_day()
        } else {
            self.daily_capacity
        }
    }

    fn slots_per_day(&self) -> i32 {
        let step = self.slot_minutes + self.buffer_minutes;
        if step <= 0 {
            return 0;
        }
        let (Some(start), Some(end)) = (parse_hhmm(&self.start_time), parse_hhmm(&self.end_time)) else {
            return 0;
        };
        if end <= start {
            return 0;
        }
        let mut count = 0;
        let mut cursor = start;
        while cursor + self.slot_minutes <= end {
            count += 1;
            cursor += step;
        }
        count
    }
}

/// Minutes since midnight for an "HH:MM" string.
pub fn parse_hhmm(value: &str) -> Option<i32> {
    let (h, m) = value.split_once(':')?;
    let hours: i32 = h.parse().ok()?;
    let minutes: i32 = m.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn workdays_mask_from_list(days: &[u8]) -> i32 {
    days.iter().filter(|d| **d <= 6).fold(0, |mask, d| mask | (1 << d))
}
