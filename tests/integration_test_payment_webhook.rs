mod common;

use axum::{body::Body, http::{header, Request, StatusCode}};
use common::{parse_body, TestApp};
use serde_json::{json, Value};
use sqlx::Row;
use tower::ServiceExt;

async fn create_product(app: &TestApp, slug: &str) -> String {
    let res = app.request(
        "POST",
        "/api/v1/admin/products",
        Some(&app.admin_cookie()),
        Some(json!({
            "slug": slug,
            "name": "Family Shoot",
            "price_cents": 32000
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

/// Walks the full booking flow up to checkout and returns
/// (request_id, hold_id, checkout_session_id).
async fn checked_out_request(app: &TestApp, slug: &str, visitor: &str) -> (String, String, String) {
    let res = app.request(
        "POST",
        "/api/v1/booking/requests",
        Some(&format!("visitor_id={}", visitor)),
        Some(json!({"product_slug": slug, "event_date": "2030-06-03"})),
    ).await;
    let request_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.request(
        "POST",
        &format!("/api/v1/booking/requests/{}/time", request_id),
        None,
        Some(json!({"time": "10:00"})),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request(
        "POST",
        &format!("/api/v1/booking/requests/{}/checkout", request_id),
        None,
        None,
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let hold_id = parse_body(res).await["hold_id"].as_str().unwrap().to_string();

    let session_id: String = sqlx::query("SELECT checkout_session_id FROM booking_requests WHERE id = ?")
        .bind(&request_id)
        .fetch_one(&app.pool)
        .await
        .unwrap()
        .get("checkout_session_id");

    (request_id, hold_id, session_id)
}

fn paid_event(session_id: &str, product_id: &str, request_id: &str, hold_id: &str) -> Value {
    json!({
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": session_id,
                "payment_status": "paid",
                "amount_total": 32000,
                "currency": "eur",
                "payment_intent": "pi_test_1",
                "customer_details": {"name": "Jane Doe", "email": "jane@example.com"},
                "metadata": {
                    "booking_request_id": request_id,
                    "product_id": product_id,
                    "event_date": "2030-06-03",
                    "selected_time": "10:00",
                    "hold_id": hold_id,
                    "visitor_id": "v-alpha"
                }
            }
        }
    })
}

async fn booking_count(app: &TestApp) -> i64 {
    sqlx::query("SELECT COUNT(*) as count FROM bookings")
        .fetch_one(&app.pool).await.unwrap().get("count")
}

#[tokio::test]
async fn test_unsigned_delivery_is_rejected() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/webhooks/payments")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"type": "checkout.session.completed"}).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_forged_signature_is_rejected() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/webhooks/payments")
            .header(header::CONTENT_TYPE, "application/json")
            .header("Stripe-Signature", "t=1,v1=deadbeef")
            .body(Body::from("{}"))
            .unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(booking_count(&app).await, 0);
}

#[tokio::test]
async fn test_unpaid_session_has_no_side_effects() {
    let app = TestApp::new().await;
    let product_id = create_product(&app, "family").await;
    let (request_id, hold_id, session_id) = checked_out_request(&app, "family", "v-alpha").await;

    let mut event = paid_event(&session_id, &product_id, &request_id, &hold_id);
    event["data"]["object"]["payment_status"] = json!("unpaid");

    let res = app.deliver_webhook(&event).await;
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(booking_count(&app).await, 0);
    let hold_status: String = sqlx::query("SELECT status FROM booking_slot_holds WHERE id = ?")
        .bind(&hold_id)
        .fetch_one(&app.pool).await.unwrap().get("status");
    assert_eq!(hold_status, "ACTIVE");
}

#[tokio::test]
async fn test_irrelevant_event_types_are_acknowledged_without_effects() {
    let app = TestApp::new().await;

    let res = app.deliver_webhook(&json!({
        "type": "invoice.created",
        "data": {"object": {"id": "in_1", "payment_status": "paid"}}
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(booking_count(&app).await, 0);
}

#[tokio::test]
async fn test_paid_session_creates_the_booking_and_settles_state() {
    let app = TestApp::new().await;
    let product_id = create_product(&app, "family").await;
    let (request_id, hold_id, session_id) = checked_out_request(&app, "family", "v-alpha").await;

    let res = app.deliver_webhook(&paid_event(&session_id, &product_id, &request_id, &hold_id)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let booking = sqlx::query("SELECT * FROM bookings WHERE checkout_session_id = ?")
        .bind(&session_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(booking.get::<String, _>("status"), "CONFIRMED");
    assert_eq!(booking.get::<String, _>("start_time"), "10:00");
    assert_eq!(booking.get::<String, _>("end_time"), "11:00");
    assert_eq!(booking.get::<String, _>("customer_email"), "jane@example.com");
    assert_eq!(booking.get::<i64, _>("amount_paid_cents"), 32000);

    let hold_status: String = sqlx::query("SELECT status FROM booking_slot_holds WHERE id = ?")
        .bind(&hold_id)
        .fetch_one(&app.pool).await.unwrap().get("status");
    assert_eq!(hold_status, "CONVERTED");

    let stage: String = sqlx::query("SELECT stage FROM booking_requests WHERE id = ?")
        .bind(&request_id)
        .fetch_one(&app.pool).await.unwrap().get("stage");
    assert_eq!(stage, "PAID");

    let activations: i64 = sqlx::query("SELECT COUNT(*) as count FROM dashboard_activations WHERE customer_email = 'jane@example.com'")
        .fetch_one(&app.pool).await.unwrap().get("count");
    assert_eq!(activations, 1);
}

#[tokio::test]
async fn test_hold_conversion_failure_does_not_fail_the_handler() {
    let app = TestApp::new().await;
    let product_id = create_product(&app, "family").await;
    let (request_id, _hold_id, session_id) = checked_out_request(&app, "family", "v-alpha").await;

    // A hold id the store has never seen: step 3 fails, the ack must not
    let event = paid_event(&session_id, &product_id, &request_id, "hold-that-does-not-exist");
    let res = app.deliver_webhook(&event).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(booking_count(&app).await, 1);
}

#[tokio::test]
async fn test_redelivery_is_idempotent() {
    let app = TestApp::new().await;
    let product_id = create_product(&app, "family").await;
    let (request_id, hold_id, session_id) = checked_out_request(&app, "family", "v-alpha").await;

    let event = paid_event(&session_id, &product_id, &request_id, &hold_id);

    let res = app.deliver_webhook(&event).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.deliver_webhook(&event).await;
    assert_eq!(res.status(), StatusCode::OK, "redelivery must be acknowledged");

    assert_eq!(booking_count(&app).await, 1, "exactly one booking per payment");
}

#[tokio::test]
async fn test_slot_duration_comes_from_the_rules() {
    let app = TestApp::new().await;
    let product_id = create_product(&app, "family").await;

    // A 90-minute rule should drive the booked end time
    let res = app.request(
        "POST",
        "/api/v1/admin/products/family/rules",
        Some(&app.admin_cookie()),
        Some(json!({
            "timezone": "UTC",
            "workdays": [1, 2, 3, 4, 5],
            "start_time": "09:00",
            "end_time": "18:00",
            "slot_minutes": 90,
            "daily_capacity": 2
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let (request_id, hold_id, session_id) = checked_out_request(&app, "family", "v-alpha").await;
    let res = app.deliver_webhook(&paid_event(&session_id, &product_id, &request_id, &hold_id)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let end_time: String = sqlx::query("SELECT end_time FROM bookings WHERE checkout_session_id = ?")
        .bind(&session_id)
        .fetch_one(&app.pool).await.unwrap().get("end_time");
    assert_eq!(end_time, "11:30");
}
