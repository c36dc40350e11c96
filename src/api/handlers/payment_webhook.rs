use axum::{body::Bytes, extract::State, http::HeaderMap, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::WebhookEvent;
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::error::AppError;
use crate::infra::payments::signature::{verify_signature, DEFAULT_TOLERANCE_SECS};
use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{info, warn};

const SIGNATURE_HEADER: &str = "stripe-signature";

/// Payment completion webhook. Inserting the permanent Booking row is
/// the single must-succeed step; everything after it is best-effort and
/// never turns a completed payment into an error response, because a
/// non-2xx here makes the gateway redeliver the event.
pub async fn handle_payment_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers.get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Validation("Missing signature header".into()))?;

    verify_signature(
        &state.config.stripe_webhook_secret,
        signature,
        &body,
        DEFAULT_TOLERANCE_SECS,
        Utc::now(),
    )?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("Malformed webhook payload".into()))?;

    if event.event_type != "checkout.session.completed" {
        return Ok(Json(json!({ "received": true })));
    }

    let session = event.data.object;
    if session.payment_status != "paid" {
        info!("Ignoring session {} with payment_status {}", session.id, session.payment_status);
        return Ok(Json(json!({ "received": true })));
    }

    let metadata = session.metadata;

    let event_date = NaiveDate::parse_from_str(&metadata.event_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid event_date in metadata".into()))?;

    // Step 1: slot duration from the product's rules, default 60.
    let slot_duration = match &metadata.product_id {
        Some(product_id) => {
            let rule = match state.rule_repo.find_active(Some(product_id)).await? {
                Some(rule) => Some(rule),
                None => state.rule_repo.find_active(None).await?,
            };
            rule.map(|r| r.slot_minutes).unwrap_or(60)
        }
        None => 60,
    };

    let end_time = crate::domain::services::slots::add_minutes(&metadata.selected_time, slot_duration)
        .unwrap_or_else(|| metadata.selected_time.clone());

    let (customer_name, customer_email) = session.customer_details
        .map(|d| (d.name.unwrap_or_default(), d.email.unwrap_or_default()))
        .unwrap_or_default();

    // Step 2: the permanent record. The unique constraint on the
    // checkout session id makes redelivery idempotent.
    let booking = Booking::new(NewBookingParams {
        booking_request_id: Some(metadata.booking_request_id.clone()),
        product_id: metadata.product_id.clone(),
        campaign_id: metadata.campaign_id.clone(),
        event_date,
        start_time: metadata.selected_time.clone(),
        end_time,
        checkout_session_id: session.id.clone(),
        payment_intent: session.payment_intent.clone(),
        amount_paid_cents: session.amount_total.unwrap_or(0),
        currency: session.currency.clone().unwrap_or_else(|| "eur".to_string()),
        customer_name,
        customer_email: customer_email.clone(),
        user_id: metadata.user_id.clone(),
    });

    let booking = match state.booking_repo.create(&booking).await {
        Ok(booking) => booking,
        Err(e) if e.is_unique_violation() => {
            info!("Session {} already processed, acknowledging redelivery", session.id);
            return Ok(Json(json!({ "received": true })));
        }
        Err(e) => return Err(e),
    };

    info!("Booking confirmed: {} for session {}", booking.id, session.id);

    // Step 3: convert the hold.
    if let Err(e) = state.hold_repo.mark_converted(&metadata.hold_id).await {
        warn!("Failed to convert hold {}: {}", metadata.hold_id, e);
    }

    // Step 4: advance the booking request to PAID.
    match state.request_repo.find_by_id(&metadata.booking_request_id).await {
        Ok(Some(mut request)) => {
            request.advance_stage("PAID");
            request.last_seen_at = Utc::now();
            if let Err(e) = state.request_repo.update(&request).await {
                warn!("Failed to mark request {} paid: {}", metadata.booking_request_id, e);
            }
        }
        Ok(None) => warn!("Booking request {} not found for paid session", metadata.booking_request_id),
        Err(e) => warn!("Failed to load request {}: {}", metadata.booking_request_id, e),
    }

    // Step 5: activate the customer dashboard.
    if let Err(e) = state.dashboard_repo
        .activate(metadata.user_id.as_deref(), &customer_email, &booking.id)
        .await
    {
        warn!("Failed to activate dashboard for booking {}: {}", booking.id, e);
    }

    // Step 6: fan out to the automation relay without blocking the ack.
    let relay = state.automation_relay.clone();
    let payload = json!({
        "booking_id": booking.id,
        "booking_request_id": booking.booking_request_id,
        "product_id": booking.product_id,
        "campaign_id": booking.campaign_id,
        "event_date": booking.event_date,
        "start_time": booking.start_time,
        "end_time": booking.end_time,
        "customer_name": booking.customer_name,
        "customer_email": booking.customer_email,
        "amount_paid_cents": booking.amount_paid_cents,
        "currency": booking.currency,
        "checkout_session_id": booking.checkout_session_id,
        "payment_intent": booking.payment_intent,
    });
    tokio::spawn(async move {
        if let Err(e) = relay.booking_confirmed(&payload).await {
            warn!("Automation relay delivery failed: {}", e);
        }
    });

    Ok(Json(json!({ "received": true })))
}
