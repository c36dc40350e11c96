use std::collections::HashSet;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use crate::domain::models::availability_override::AvailabilityOverride;

/// Closed set of bulk-override patterns for the admin calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    WeekdaysAvailable,
    WeekendsAvailable,
    Reset,
}

impl Preset {
    pub fn parse(value: &str) -> Option<Preset> {
        match value {
            "weekdays-available" => Some(Preset::WeekdaysAvailable),
            "weekends-available" => Some(Preset::WeekendsAvailable),
            "reset" => Some(Preset::Reset),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::WeekdaysAvailable => "weekdays-available",
            Preset::WeekendsAvailable => "weekends-available",
            Preset::Reset => "reset",
        }
    }
}

/// Friday, Saturday and Sunday count as the extended weekend; the
/// presets treat Monday-Thursday as the weekday block.
fn is_extended_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Fri | Weekday::Sat | Weekday::Sun)
}

pub struct PresetPlan {
    pub rows: Vec<AvailabilityOverride>,
    pub applied: u32,
    pub skipped: u32,
}

/// Builds the override rows a preset would write over [start, end].
/// Protected dates (already carrying a confirmed booking) get no row
/// and are counted as skipped. `reset` plans no rows at all: the
/// caller's range delete is the whole effect.
pub fn build_plan(
    preset: Preset,
    product_id: Option<&str>,
    start: NaiveDate,
    end: NaiveDate,
    protected: &HashSet<NaiveDate>,
    daily_capacity: Option<i32>,
    actor: Option<&str>,
) -> PresetPlan {
    let mut plan = PresetPlan { rows: Vec::new(), applied: 0, skipped: 0 };

    if preset == Preset::Reset {
        return plan;
    }

    let mut date = start;
    while date <= end {
        if protected.contains(&date) {
            plan.skipped += 1;
        } else {
            let weekend = is_extended_weekend(date);
            let available = match preset {
                Preset::WeekdaysAvailable => !weekend,
                Preset::WeekendsAvailable => weekend,
                Preset::Reset => unreachable!(),
            };
            let (status, capacity) = if available {
                // Status-only: capacity stays inherited from the rule.
                ("AVAILABLE", None)
            } else {
                ("LIMITED", daily_capacity)
            };
            plan.rows.push(AvailabilityOverride::whole_day(
                product_id.map(str::to_string),
                date,
                status.to_string(),
                capacity,
                actor.map(str::to_string),
            ));
            plan.applied += 1;
        }
        date += Duration::days(1);
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        // 2030-01-07 is a Monday
        NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
    }

    #[test]
    fn weekdays_preset_splits_a_week() {
        let start = monday();
        let end = start + Duration::days(6);
        let plan = build_plan(Preset::WeekdaysAvailable, None, start, end, &HashSet::new(), Some(1), None);

        assert_eq!(plan.applied, 7);
        assert_eq!(plan.skipped, 0);
        let available: Vec<_> = plan.rows.iter().filter(|r| r.status == "AVAILABLE").collect();
        let limited: Vec<_> = plan.rows.iter().filter(|r| r.status == "LIMITED").collect();
        assert_eq!(available.len(), 4);
        assert_eq!(limited.len(), 3);
        assert!(available.iter().all(|r| r.capacity_override.is_none()));
        assert!(limited.iter().all(|r| r.capacity_override == Some(1)));
    }

    #[test]
    fn weekends_preset_mirrors() {
        let start = monday();
        let end = start + Duration::days(6);
        let plan = build_plan(Preset::WeekendsAvailable, None, start, end, &HashSet::new(), None, None);

        assert_eq!(plan.rows.iter().filter(|r| r.status == "AVAILABLE").count(), 3);
        assert_eq!(plan.rows.iter().filter(|r| r.status == "LIMITED").count(), 4);
    }

    #[test]
    fn protected_dates_are_skipped_not_applied() {
        let start = monday();
        let end = start + Duration::days(6);
        let protected: HashSet<NaiveDate> = [start, start + Duration::days(4)].into_iter().collect();
        let plan = build_plan(Preset::WeekdaysAvailable, None, start, end, &protected, None, None);

        assert_eq!(plan.applied, 5);
        assert_eq!(plan.skipped, 2);
        assert!(plan.rows.iter().all(|r| r.date != Some(start)));
    }

    #[test]
    fn reset_plans_no_rows() {
        let start = monday();
        let plan = build_plan(Preset::Reset, None, start, start + Duration::days(13), &HashSet::new(), None, None);
        assert!(plan.rows.is_empty());
        assert_eq!(plan.applied, 0);
        assert_eq!(plan.skipped, 0);
    }
}
