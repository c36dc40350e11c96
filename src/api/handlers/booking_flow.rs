use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::identity::BookingIdentity;
use crate::api::dtos::requests::{SelectTimeRequest, StartBookingRequest};
use crate::api::dtos::responses::{BookingRequestResponse, SlotsResponse};
use crate::domain::models::booking_request::{BookingRequest, BookingTarget};
use crate::domain::models::product::BookingConfig;
use crate::domain::models::availability_rule::parse_hhmm;
use crate::domain::services::slots::generate_time_slots;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use tracing::info;

fn to_response(request: &BookingRequest) -> BookingRequestResponse {
    BookingRequestResponse {
        id: request.id.clone(),
        event_date: request.event_date,
        stage: request.stage.clone(),
        availability_version: request.availability_version(Utc::now()).to_string(),
        offer_expires_at: request.offer_expires_at,
        selected_time: request.selected_time.clone(),
    }
}

/// Find-or-create keyed on (target, identity, date). Revisits reuse the
/// row: last_seen advances, stage never regresses, and the offer window
/// keeps its original deadline.
pub async fn start_booking_request(
    State(state): State<Arc<AppState>>,
    BookingIdentity(identity): BookingIdentity,
    Json(payload): Json<StartBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event_date = NaiveDate::parse_from_str(&payload.event_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid event_date (expected YYYY-MM-DD)".into()))?;

    let (target, offer_window_hours, timezone) = match (&payload.product_slug, &payload.campaign_id) {
        (Some(slug), None) => {
            let product = state.product_repo.find_by_slug(slug).await?
                .ok_or(AppError::NotFound("Product not found".into()))?;
            if !product.is_active {
                return Err(AppError::Validation("Product is not bookable".into()));
            }
            let tz = payload.timezone.clone().unwrap_or_else(|| "UTC".to_string());
            (BookingTarget::Product(product.id.clone()), product.offer_window_hours as i64, tz)
        }
        (None, Some(campaign_id)) => {
            let card_index = payload.campaign_card_index
                .ok_or(AppError::Validation("campaign_card_index required for campaign bookings".into()))?;
            if card_index < 0 {
                return Err(AppError::Validation("campaign_card_index must not be negative".into()));
            }
            let tz = payload.timezone.clone().unwrap_or_else(|| "UTC".to_string());
            (
                BookingTarget::CampaignCard { campaign_id: campaign_id.clone(), card_index },
                state.config.default_offer_window_hours,
                tz,
            )
        }
        _ => {
            return Err(AppError::Validation(
                "Provide either product_slug or campaign_id, not both".into(),
            ));
        }
    };

    if timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(AppError::Validation("Unknown timezone".into()));
    }

    if let Some(mut existing) = state.request_repo.find_by_key(&target, &identity, event_date).await? {
        existing.last_seen_at = Utc::now();
        let updated = state.request_repo.update(&existing).await?;
        return Ok(Json(to_response(&updated)));
    }

    let request = BookingRequest::new(&target, &identity, event_date, timezone, offer_window_hours);
    let created = state.request_repo.create(&request).await?;
    info!("Booking request created: {} for {}", created.id, event_date);
    Ok(Json(to_response(&created)))
}

/// Candidate start times for the request, full or limited depending on
/// the offer window.
pub async fn get_time_slots(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Booking request not found".into()))?;

    let (config, slot_duration) = match &request.product_id {
        Some(product_id) => {
            let product = state.product_repo.find_by_id(product_id).await?
                .ok_or(AppError::NotFound("Product not found".into()))?;
            (product.booking_config(), product.slot_duration_min)
        }
        None => (BookingConfig::default(), 60),
    };

    let version = request.availability_version(Utc::now());
    let slots = generate_time_slots(version, &config, slot_duration);

    Ok(Json(SlotsResponse {
        version: version.to_string(),
        slots,
    }))
}

/// Stores the chosen start time. Free-ness is deliberately not checked
/// here; the checkout hold is where contention is resolved.
pub async fn select_time(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
    Json(payload): Json<SelectTimeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if parse_hhmm(&payload.time).is_none() {
        return Err(AppError::Validation("Invalid time (expected HH:MM)".into()));
    }

    let mut request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Booking request not found".into()))?;

    request.selected_time = Some(payload.time);
    request.advance_stage("TIME_SELECTED");
    request.last_seen_at = Utc::now();

    let updated = state.request_repo.update(&request).await?;
    Ok(Json(to_response(&updated)))
}
