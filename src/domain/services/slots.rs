use crate::domain::models::availability_rule::parse_hhmm;
use crate::domain::models::product::BookingConfig;

fn format_minutes(total: i32) -> String {
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// "HH:MM" plus a duration, clamped to the same day.
pub fn add_minutes(time: &str, minutes: i32) -> Option<String> {
    let start = parse_hhmm(time)?;
    let end = start + minutes;
    if end > 24 * 60 {
        return None;
    }
    Some(format_minutes(end))
}

/// Candidate start times for a booking request. The limited version is
/// the product's curated list; the full version slices the configured
/// window into slot-sized steps, dropping a trailing slot that would
/// overrun the window end.
pub fn generate_time_slots(version: &str, config: &BookingConfig, slot_duration_min: i32) -> Vec<String> {
    if version == "limited" {
        return config.limited_slots.clone();
    }

    let (Some(start), Some(end)) = (
        parse_hhmm(&config.full_window_start),
        parse_hhmm(&config.full_window_end),
    ) else {
        return Vec::new();
    };
    if slot_duration_min <= 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = start;
    while cursor + slot_duration_min <= end {
        slots.push(format_minutes(cursor));
        cursor += slot_duration_min;
    }
    slots
}
