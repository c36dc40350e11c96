use std::collections::{BTreeMap, HashMap};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use crate::domain::models::availability_override::AvailabilityOverride;
use crate::domain::models::availability_rule::AvailabilityRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Available,
    Limited,
    Full,
    Blocked,
    NeedsReview,
}

impl DayStatus {
    fn from_override(status: &str) -> DayStatus {
        match status {
            "AVAILABLE" => DayStatus::Available,
            "LIMITED" => DayStatus::Limited,
            "FULL" => DayStatus::Full,
            _ => DayStatus::Blocked,
        }
    }
}

/// Derived per-day result; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub status: DayStatus,
    pub available_count: i32,
    pub total_count: i32,
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (next, NaiveDate::from_ymd_opt(year, month, 1)) {
        (Some(next), Some(first)) => next.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

/// Merges the active rule, whole-day overrides and existing confirmed
/// bookings into a per-day status map for one month.
///
/// No active rule means the admin has not configured availability yet:
/// every day reports `needs_review`, which is data, not an error.
pub fn compute_month(
    rule: Option<&AvailabilityRule>,
    overrides: &[AvailabilityOverride],
    booked: &HashMap<NaiveDate, i64>,
    year: i32,
    month: u32,
) -> BTreeMap<String, DayAvailability> {
    let mut result = BTreeMap::new();

    // Precedence: product-scoped override beats the global one for the
    // same date. Whole-day rows only; partial-day rows do not feed the
    // month view.
    let mut by_date: HashMap<NaiveDate, &AvailabilityOverride> = HashMap::new();
    for o in overrides.iter().filter(|o| o.product_id.is_none()) {
        if let Some(date) = o.date {
            by_date.insert(date, o);
        }
    }
    for o in overrides.iter().filter(|o| o.product_id.is_some()) {
        if let Some(date) = o.date {
            by_date.insert(date, o);
        }
    }

    for day in 1..=days_in_month(year, month) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        let key = date.format("%Y-%m-%d").to_string();

        let Some(rule) = rule else {
            result.insert(key, DayAvailability {
                status: DayStatus::NeedsReview,
                available_count: 0,
                total_count: 0,
            });
            continue;
        };

        let (status, total) = match by_date.get(&date) {
            Some(o) => (
                DayStatus::from_override(&o.status),
                o.capacity_override.unwrap_or_else(|| rule.day_capacity()),
            ),
            None => {
                if rule.is_workday(date.weekday()) {
                    (DayStatus::Available, rule.day_capacity())
                } else {
                    (DayStatus::Blocked, 0)
                }
            }
        };

        let occupied = booked.get(&date).copied().unwrap_or(0) as i32;
        result.insert(key, DayAvailability {
            status,
            available_count: (total - occupied).max(0),
            total_count: total,
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::availability_rule::NewRuleParams;

    fn weekday_rule() -> AvailabilityRule {
        // Monday-Friday, 1 per day
        AvailabilityRule::new(NewRuleParams {
            product_id: None,
            timezone: "Europe/Berlin".to_string(),
            workdays_mask: 0b0111110,
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            slot_minutes: 60,
            buffer_minutes: 0,
            capacity_type: "DAILY".to_string(),
            daily_capacity: 2,
            slot_capacity: 1,
        })
    }

    #[test]
    fn no_rule_means_needs_review_everywhere() {
        let days = compute_month(None, &[], &HashMap::new(), 2030, 6);
        assert_eq!(days.len(), 30);
        assert!(days.values().all(|d| d.status == DayStatus::NeedsReview));
    }

    #[test]
    fn workday_membership_drives_status() {
        let rule = weekday_rule();
        let days = compute_month(Some(&rule), &[], &HashMap::new(), 2030, 6);
        // 2030-06-03 is a Monday, 2030-06-02 a Sunday
        assert_eq!(days["2030-06-03"].status, DayStatus::Available);
        assert_eq!(days["2030-06-03"].total_count, 2);
        assert_eq!(days["2030-06-02"].status, DayStatus::Blocked);
        assert_eq!(days["2030-06-02"].total_count, 0);
    }

    #[test]
    fn override_wins_and_inherits_capacity_when_null() {
        let rule = weekday_rule();
        let date = NaiveDate::from_ymd_opt(2030, 6, 3).unwrap();
        let status_only = AvailabilityOverride::whole_day(None, date, "LIMITED".to_string(), None, None);
        let days = compute_month(Some(&rule), &[status_only], &HashMap::new(), 2030, 6);
        assert_eq!(days["2030-06-03"].status, DayStatus::Limited);
        assert_eq!(days["2030-06-03"].total_count, 2);

        let capped = AvailabilityOverride::whole_day(None, date, "LIMITED".to_string(), Some(1), None);
        let days = compute_month(Some(&rule), &[capped], &HashMap::new(), 2030, 6);
        assert_eq!(days["2030-06-03"].total_count, 1);
    }

    #[test]
    fn product_override_beats_global() {
        let rule = weekday_rule();
        let date = NaiveDate::from_ymd_opt(2030, 6, 3).unwrap();
        let global = AvailabilityOverride::whole_day(None, date, "BLOCKED".to_string(), None, None);
        let scoped = AvailabilityOverride::whole_day(Some("p1".to_string()), date, "FULL".to_string(), None, None);
        let days = compute_month(Some(&rule), &[scoped, global], &HashMap::new(), 2030, 6);
        assert_eq!(days["2030-06-03"].status, DayStatus::Full);
    }

    #[test]
    fn bookings_reduce_available_count() {
        let rule = weekday_rule();
        let date = NaiveDate::from_ymd_opt(2030, 6, 3).unwrap();
        let booked: HashMap<NaiveDate, i64> = [(date, 3)].into_iter().collect();
        let days = compute_month(Some(&rule), &[], &booked, 2030, 6);
        assert_eq!(days["2030-06-03"].available_count, 0);
        assert_eq!(days["2030-06-03"].total_count, 2);
    }
}
