use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::UpsertRuleRequest;
use crate::domain::models::availability_rule::{
    parse_hhmm, workdays_mask_from_list, AvailabilityRule, NewRuleParams,
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn validate_rule(payload: &UpsertRuleRequest) -> Result<(), AppError> {
    let start = parse_hhmm(&payload.start_time)
        .ok_or(AppError::Validation("Invalid start_time (expected HH:MM)".into()))?;
    let end = parse_hhmm(&payload.end_time)
        .ok_or(AppError::Validation("Invalid end_time (expected HH:MM)".into()))?;
    if start >= end {
        return Err(AppError::Validation("start_time must be before end_time".into()));
    }
    if payload.slot_minutes <= 0 {
        return Err(AppError::Validation("slot_minutes must be positive".into()));
    }
    if payload.buffer_minutes.unwrap_or(0) < 0 {
        return Err(AppError::Validation("buffer_minutes must not be negative".into()));
    }
    if payload.daily_capacity.unwrap_or(1) < 0 || payload.slot_capacity.unwrap_or(1) < 0 {
        return Err(AppError::Validation("Capacities must not be negative".into()));
    }
    if let Some(capacity_type) = &payload.capacity_type
        && capacity_type != "DAILY" && capacity_type != "PER_SLOT" {
        return Err(AppError::Validation("capacity_type must be DAILY or PER_SLOT".into()));
    }
    if payload.timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(AppError::Validation("Unknown timezone".into()));
    }
    if payload.workdays.iter().any(|d| *d > 6) {
        return Err(AppError::Validation("Workdays must be 0-6 (Sunday-Saturday)".into()));
    }
    Ok(())
}

async fn create_rule_scoped(
    state: &AppState,
    product_id: Option<String>,
    payload: UpsertRuleRequest,
) -> Result<AvailabilityRule, AppError> {
    validate_rule(&payload)?;

    let is_active = payload.is_active.unwrap_or(true);

    // At most one active rule per scope. Writes that would create a
    // second active rule are rejected instead of silently coexisting.
    if is_active && state.rule_repo.count_active(product_id.as_deref()).await? > 0 {
        return Err(AppError::Conflict(
            "An active availability rule already exists for this scope; deactivate it first".into(),
        ));
    }

    let mut rule = AvailabilityRule::new(NewRuleParams {
        product_id,
        timezone: payload.timezone,
        workdays_mask: workdays_mask_from_list(&payload.workdays),
        start_time: payload.start_time,
        end_time: payload.end_time,
        slot_minutes: payload.slot_minutes,
        buffer_minutes: payload.buffer_minutes.unwrap_or(0),
        capacity_type: payload.capacity_type.unwrap_or_else(|| "DAILY".to_string()),
        daily_capacity: payload.daily_capacity.unwrap_or(1),
        slot_capacity: payload.slot_capacity.unwrap_or(1),
    });
    rule.is_active = is_active;

    state.rule_repo.create(&rule).await
}

pub async fn create_product_rule(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(slug): Path<String>,
    Json(payload): Json<UpsertRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Product not found".into()))?;

    let created = create_rule_scoped(&state, Some(product.id), payload).await?;
    info!("Availability rule created for product {}: {}", slug, created.id);
    Ok(Json(created))
}

pub async fn create_global_rule(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<UpsertRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = create_rule_scoped(&state, None, payload).await?;
    info!("Global availability rule created: {}", created.id);
    Ok(Json(created))
}

pub async fn list_product_rules(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Product not found".into()))?;

    let rules = state.rule_repo.list(Some(&product.id)).await?;
    Ok(Json(rules))
}

pub async fn deactivate_rule(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(rule_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut rule = state.rule_repo.find_by_id(&rule_id).await?
        .ok_or(AppError::NotFound("Rule not found".into()))?;

    rule.is_active = false;
    let updated = state.rule_repo.update(&rule).await?;
    info!("Availability rule deactivated: {}", rule_id);
    Ok(Json(updated))
}
