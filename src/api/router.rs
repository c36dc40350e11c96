use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    audit, availability, availability_rule, booking_flow, checkout, health,
    overrides, payment_webhook, preset, product,
};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Public catalogue
        .route("/api/v1/products", get(product::list_products))
        .route("/api/v1/products/{slug}", get(product::get_product))
        .route("/api/v1/products/{slug}/availability", get(availability::get_month_availability))

        // Booking flow
        .route("/api/v1/booking/requests", post(booking_flow::start_booking_request))
        .route("/api/v1/booking/requests/{request_id}/slots", get(booking_flow::get_time_slots))
        .route("/api/v1/booking/requests/{request_id}/time", post(booking_flow::select_time))
        .route("/api/v1/booking/requests/{request_id}/checkout", post(checkout::begin_checkout))

        // Payment gateway webhook
        .route("/api/v1/webhooks/payments", post(payment_webhook::handle_payment_webhook))

        // Admin - products & rules
        .route("/api/v1/admin/products", post(product::create_product))
        .route("/api/v1/admin/products/{slug}/rules", get(availability_rule::list_product_rules).post(availability_rule::create_product_rule))
        .route("/api/v1/admin/rules", post(availability_rule::create_global_rule))
        .route("/api/v1/admin/rules/{rule_id}/deactivate", post(availability_rule::deactivate_rule))

        // Admin - calendar overrides
        .route("/api/v1/admin/overrides", get(overrides::list_overrides).post(overrides::upsert_override))
        .route("/api/v1/admin/overrides/preset", post(preset::apply_preset))
        .route("/api/v1/admin/overrides/{override_id}", delete(overrides::delete_override))

        // Admin - audit trail
        .route("/api/v1/admin/audit-log", get(audit::list_audit_log))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
