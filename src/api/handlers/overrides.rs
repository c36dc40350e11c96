use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::{ListOverridesQuery, OverrideRequest};
use crate::domain::models::audit::AuditLogEntry;
use crate::domain::models::availability_override::{AvailabilityOverride, OVERRIDE_STATUSES};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (expected YYYY-MM-DD)", field)))
}

pub async fn upsert_override(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(payload): Json<OverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !OVERRIDE_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::Validation("status must be AVAILABLE, LIMITED, FULL or BLOCKED".into()));
    }

    // Exactly one of the two forms: a whole-day date, or an intra-day range.
    match (payload.date, payload.start_at, payload.end_at) {
        (Some(_), None, None) => {}
        (None, Some(start), Some(end)) if start < end => {}
        (None, Some(_), Some(_)) => {
            return Err(AppError::Validation("start_at must be before end_at".into()));
        }
        _ => {
            return Err(AppError::Validation(
                "Provide either date, or both start_at and end_at".into(),
            ));
        }
    }

    if let Some(product_id) = &payload.product_id
        && state.product_repo.find_by_id(product_id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".into()));
    }

    let entity = AvailabilityOverride {
        id: Uuid::new_v4().to_string(),
        product_id: payload.product_id,
        date: payload.date,
        start_at: payload.start_at,
        end_at: payload.end_at,
        status: payload.status,
        capacity_override: payload.capacity_override,
        reason: payload.reason,
        created_by: Some(admin.0.sub.clone()),
        created_at: Utc::now(),
    };

    let saved = state.override_repo.upsert(&entity).await?;

    state.audit_repo.append(&AuditLogEntry::new(
        "override.upsert",
        Some(admin.0.sub),
        json!({
            "override_id": saved.id,
            "product_id": saved.product_id,
            "date": saved.date,
            "start_at": saved.start_at,
            "end_at": saved.end_at,
            "status": saved.status,
            "capacity_override": saved.capacity_override,
        }),
    )).await?;

    info!("Upserted availability override {}", saved.id);
    Ok(Json(saved))
}

pub async fn list_overrides(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<ListOverridesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = parse_date(&query.start, "start")?;
    let end = parse_date(&query.end, "end")?;

    let overrides = state.override_repo
        .list_by_range(query.product_id.as_deref(), start, end)
        .await?;
    Ok(Json(overrides))
}

pub async fn delete_override(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(override_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state.override_repo.find_by_id(&override_id).await?
        .ok_or(AppError::NotFound("Override not found".into()))?;

    state.override_repo.delete(&override_id).await?;

    state.audit_repo.append(&AuditLogEntry::new(
        "override.delete",
        Some(admin.0.sub),
        json!({
            "override_id": existing.id,
            "product_id": existing.product_id,
            "date": existing.date,
            "status": existing.status,
        }),
    )).await?;

    info!("Deleted availability override {}", override_id);
    Ok(Json(json!({"status": "deleted"})))
}
