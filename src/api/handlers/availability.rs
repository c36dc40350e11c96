use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::MonthQuery;
use crate::api::dtos::responses::MonthAvailabilityResponse;
use crate::domain::services::availability::{compute_month, days_in_month};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::NaiveDate;

/// Month calendar for a product's date picker and the admin calendar.
/// Merges the active rule (product scope, falling back to global),
/// whole-day overrides and confirmed booking counts.
pub async fn get_month_availability(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, AppError> {
    if !(1..=12).contains(&query.month) {
        return Err(AppError::Validation("month must be 1-12".into()));
    }

    let product = state.product_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Product not found".into()))?;

    let first = NaiveDate::from_ymd_opt(query.year, query.month, 1)
        .ok_or(AppError::Validation("Invalid year/month".into()))?;
    let last = NaiveDate::from_ymd_opt(query.year, query.month, days_in_month(query.year, query.month))
        .ok_or(AppError::Validation("Invalid year/month".into()))?;

    let rule = match state.rule_repo.find_active(Some(&product.id)).await? {
        Some(rule) => Some(rule),
        None => state.rule_repo.find_active(None).await?,
    };

    let mut overrides = state.override_repo.list_by_range(None, first, last).await?;
    overrides.extend(state.override_repo.list_by_range(Some(&product.id), first, last).await?);

    let booked: HashMap<NaiveDate, i64> = state.booking_repo
        .count_by_date_range(Some(&product.id), first, last)
        .await?
        .into_iter()
        .collect();

    let days = compute_month(rule.as_ref(), &overrides, &booked, query.year, query.month);

    Ok(Json(MonthAvailabilityResponse {
        year: query.year,
        month: query.month,
        days,
    }))
}
