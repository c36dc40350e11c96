use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::ApplyPresetRequest;
use crate::api::dtos::responses::PresetResultResponse;
use crate::domain::models::audit::AuditLogEntry;
use crate::domain::services::presets::{build_plan, Preset};
use crate::error::AppError;
use std::collections::HashSet;
use std::sync::Arc;
use chrono::NaiveDate;
use serde_json::json;
use tracing::info;

const MAX_PRESET_RANGE_DAYS: i64 = 366;

/// Bulk-applies a named preset over a date range. Dates that already
/// carry a confirmed booking are protected: they receive no override
/// and are reported as skipped. The range delete and the bulk insert
/// run in one transaction, so a mid-flight failure leaves the previous
/// overrides untouched.
pub async fn apply_preset(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(payload): Json<ApplyPresetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let preset = Preset::parse(&payload.preset)
        .ok_or(AppError::Validation("Unknown preset".into()))?;

    let start = NaiveDate::parse_from_str(&payload.start_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid start_date (expected YYYY-MM-DD)".into()))?;
    let end = NaiveDate::parse_from_str(&payload.end_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid end_date (expected YYYY-MM-DD)".into()))?;

    if end < start {
        return Err(AppError::Validation("end_date must not precede start_date".into()));
    }
    if end.signed_duration_since(start).num_days() >= MAX_PRESET_RANGE_DAYS {
        return Err(AppError::Validation("Preset range is limited to one year".into()));
    }

    if let Some(product_id) = &payload.product_id
        && state.product_repo.find_by_id(product_id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".into()));
    }

    let protected: HashSet<NaiveDate> = state.booking_repo
        .booked_dates_in_range(payload.product_id.as_deref(), start, end)
        .await?
        .into_iter()
        .collect();

    let plan = build_plan(
        preset,
        payload.product_id.as_deref(),
        start,
        end,
        &protected,
        payload.daily_capacity,
        Some(admin.0.sub.as_str()),
    );

    let deleted = state.override_repo
        .replace_range(payload.product_id.as_deref(), start, end, &plan.rows)
        .await?;

    // One summarizing audit row per bulk apply, not one per date.
    state.audit_repo.append(&AuditLogEntry::new(
        "override.preset_apply",
        Some(admin.0.sub),
        json!({
            "preset": preset.as_str(),
            "product_id": payload.product_id,
            "start_date": payload.start_date,
            "end_date": payload.end_date,
            "deleted": deleted,
            "applied": plan.applied,
            "skipped": plan.skipped,
        }),
    )).await?;

    info!(
        "Preset {} applied over {}..{}: {} applied, {} skipped, {} deleted",
        preset.as_str(), start, end, plan.applied, plan.skipped, deleted
    );

    Ok(Json(PresetResultResponse {
        applied: plan.applied,
        skipped: plan.skipped,
    }))
}
