use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::CheckoutResponse;
use crate::domain::models::payment::{CheckoutMetadata, CheckoutSessionParams};
use crate::domain::models::slot_hold::BookingSlotHold;
use crate::domain::services::slots::add_minutes;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};

/// Begins checkout for a booking request: claims the selected slot with
/// a time-boxed exclusive hold, then hands off to the payment gateway.
/// The store's uniqueness constraint on (product, date, start_time) is
/// the final arbiter between two concurrent claims; a violation here is
/// "slot just taken", not a server fault.
pub async fn begin_checkout(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut request = state.request_repo.find_by_id(&request_id).await?
        .ok_or(AppError::NotFound("Booking request not found".into()))?;

    let selected_time = request.selected_time.clone()
        .ok_or(AppError::Validation("Select a time before starting checkout".into()))?;

    let product_id = request.product_id.clone()
        .ok_or(AppError::Validation("Checkout requires a product booking".into()))?;

    let product = state.product_repo.find_by_id(&product_id).await?
        .ok_or(AppError::NotFound("Product not found".into()))?;

    let end_time = add_minutes(&selected_time, product.slot_duration_min)
        .ok_or(AppError::Validation("Selected time does not fit within the day".into()))?;

    let now = Utc::now();

    if let Some(existing) = state.hold_repo
        .find_blocking(&product.id, request.event_date, &selected_time)
        .await?
    {
        if existing.status == "CONVERTED" {
            return Err(AppError::Conflict("This time slot is already booked".into()));
        }
        if !existing.is_expired(now) {
            return Err(AppError::Conflict(
                "This time slot is currently held by another customer; try a different time".into(),
            ));
        }
        // Stale hold: expire it lazily and take the slot over.
        state.hold_repo.mark_expired(&existing.id).await?;
    }

    let hold = BookingSlotHold::new(
        request.id.clone(),
        product.id.clone(),
        request.event_date,
        selected_time.clone(),
        end_time,
        state.config.checkout_hold_minutes,
    );

    let hold = match state.hold_repo.create(&hold).await {
        Ok(hold) => hold,
        Err(e) if e.is_unique_violation() => {
            warn!("Slot hold race lost for {} {} {}", product.id, request.event_date, selected_time);
            return Err(AppError::Conflict("This time slot was just taken; pick another one".into()));
        }
        Err(e) => return Err(e),
    };

    let metadata = CheckoutMetadata {
        booking_request_id: request.id.clone(),
        product_id: Some(product.id.clone()),
        campaign_id: request.campaign_id.clone(),
        event_date: request.event_date.format("%Y-%m-%d").to_string(),
        selected_time: selected_time.clone(),
        hold_id: hold.id.clone(),
        user_id: request.user_id.clone(),
        visitor_id: request.visitor_id.clone(),
    };

    let session = state.payment_gateway.create_checkout_session(&CheckoutSessionParams {
        product_name: product.name.clone(),
        amount_cents: product.price_cents,
        currency: product.currency.clone(),
        stripe_price_id: product.stripe_price_id.clone(),
        success_url: format!("{}/booking/success?session_id={{CHECKOUT_SESSION_ID}}", state.config.frontend_url),
        cancel_url: format!("{}/booking/cancelled", state.config.frontend_url),
        // The gateway session dies with the hold, so an abandoned
        // checkout frees the slot without any sweeper.
        expires_at: hold.expires_at,
        metadata,
    }).await?;

    request.advance_stage("CHECKOUT_STARTED");
    request.checkout_session_id = Some(session.id.clone());
    request.last_seen_at = now;
    state.request_repo.update(&request).await?;

    info!(
        "Checkout started for request {}: hold {} on {} {}",
        request.id, hold.id, request.event_date, selected_time
    );

    Ok(Json(CheckoutResponse {
        checkout_url: session.url,
        hold_id: hold.id,
        hold_expires_at: hold.expires_at,
    }))
}
