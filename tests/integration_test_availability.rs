mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{parse_body, TestApp};
use serde_json::json;
use uuid::Uuid;

async fn create_product(app: &TestApp, slug: &str) -> String {
    let res = app.request(
        "POST",
        "/api/v1/admin/products",
        Some(&app.admin_cookie()),
        Some(json!({
            "slug": slug,
            "name": "Portrait Session",
            "price_cents": 25000
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn create_weekday_rule(app: &TestApp, slug: &str, daily_capacity: i32) {
    let res = app.request(
        "POST",
        &format!("/api/v1/admin/products/{}/rules", slug),
        Some(&app.admin_cookie()),
        Some(json!({
            "timezone": "Europe/Berlin",
            "workdays": [1, 2, 3, 4, 5],
            "start_time": "09:00",
            "end_time": "17:00",
            "slot_minutes": 60,
            "daily_capacity": daily_capacity
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
}

async fn insert_confirmed_booking(app: &TestApp, product_id: &str, date: &str) {
    sqlx::query(
        "INSERT INTO bookings (id, product_id, event_date, start_time, end_time, status, checkout_session_id, created_at)
         VALUES (?, ?, ?, ?, ?, 'CONFIRMED', ?, ?)"
    )
        .bind(Uuid::new_v4().to_string())
        .bind(product_id)
        .bind(date)
        .bind("10:00")
        .bind("11:00")
        .bind(format!("cs_seed_{}", Uuid::new_v4().simple()))
        .bind(Utc::now())
        .execute(&app.pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_rule_yields_needs_review_for_every_day() {
    let app = TestApp::new().await;
    create_product(&app, "portrait").await;

    let res = app.request("GET", "/api/v1/products/portrait/availability?year=2030&month=6", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    let days = body["days"].as_object().unwrap();
    assert_eq!(days.len(), 30);
    assert!(days.values().all(|d| d["status"] == "needs_review"));
}

#[tokio::test]
async fn test_workday_membership_blocks_off_days() {
    let app = TestApp::new().await;
    create_product(&app, "portrait").await;
    create_weekday_rule(&app, "portrait", 2).await;

    let res = app.request("GET", "/api/v1/products/portrait/availability?year=2030&month=6", None, None).await;
    let body = parse_body(res).await;

    // 2030-06-03 is a Monday, 2030-06-02 a Sunday
    assert_eq!(body["days"]["2030-06-03"]["status"], "available");
    assert_eq!(body["days"]["2030-06-03"]["total_count"], 2);
    assert_eq!(body["days"]["2030-06-02"]["status"], "blocked");
    assert_eq!(body["days"]["2030-06-02"]["total_count"], 0);
}

#[tokio::test]
async fn test_override_status_wins_and_capacity_inherits_when_null() {
    let app = TestApp::new().await;
    create_product(&app, "portrait").await;
    create_weekday_rule(&app, "portrait", 2).await;

    let res = app.request(
        "POST",
        "/api/v1/admin/overrides",
        Some(&app.admin_cookie()),
        Some(json!({
            "date": "2030-06-03",
            "status": "LIMITED",
            "capacity_override": null
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("GET", "/api/v1/products/portrait/availability?year=2030&month=6", None, None).await;
    let body = parse_body(res).await;
    assert_eq!(body["days"]["2030-06-03"]["status"], "limited");
    // capacity_override null inherits the rule's capacity
    assert_eq!(body["days"]["2030-06-03"]["total_count"], 2);

    // Re-upserting with an explicit capacity replaces the row
    let res = app.request(
        "POST",
        "/api/v1/admin/overrides",
        Some(&app.admin_cookie()),
        Some(json!({
            "date": "2030-06-03",
            "status": "LIMITED",
            "capacity_override": 1
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("GET", "/api/v1/products/portrait/availability?year=2030&month=6", None, None).await;
    let body = parse_body(res).await;
    assert_eq!(body["days"]["2030-06-03"]["total_count"], 1);
}

#[tokio::test]
async fn test_confirmed_bookings_reduce_available_count() {
    let app = TestApp::new().await;
    let product_id = create_product(&app, "portrait").await;
    create_weekday_rule(&app, "portrait", 2).await;

    insert_confirmed_booking(&app, &product_id, "2030-06-03").await;

    let res = app.request("GET", "/api/v1/products/portrait/availability?year=2030&month=6", None, None).await;
    let body = parse_body(res).await;
    assert_eq!(body["days"]["2030-06-03"]["available_count"], 1);
    assert_eq!(body["days"]["2030-06-03"]["total_count"], 2);
}

#[tokio::test]
async fn test_global_rule_applies_when_product_has_none() {
    let app = TestApp::new().await;
    create_product(&app, "portrait").await;

    let res = app.request(
        "POST",
        "/api/v1/admin/rules",
        Some(&app.admin_cookie()),
        Some(json!({
            "timezone": "UTC",
            "workdays": [1, 2, 3, 4, 5],
            "start_time": "10:00",
            "end_time": "16:00",
            "slot_minutes": 60,
            "daily_capacity": 1
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("GET", "/api/v1/products/portrait/availability?year=2030&month=6", None, None).await;
    let body = parse_body(res).await;
    assert_eq!(body["days"]["2030-06-03"]["status"], "available");
    assert_eq!(body["days"]["2030-06-03"]["total_count"], 1);
}

#[tokio::test]
async fn test_second_active_rule_for_same_scope_is_rejected() {
    let app = TestApp::new().await;
    create_product(&app, "portrait").await;
    create_weekday_rule(&app, "portrait", 2).await;

    let res = app.request(
        "POST",
        "/api/v1/admin/products/portrait/rules",
        Some(&app.admin_cookie()),
        Some(json!({
            "timezone": "UTC",
            "workdays": [6],
            "start_time": "09:00",
            "end_time": "12:00",
            "slot_minutes": 60
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_surfaces_require_auth() {
    let app = TestApp::new().await;

    let res = app.request(
        "POST",
        "/api/v1/admin/products",
        None,
        Some(json!({"slug": "x", "name": "X", "price_cents": 100})),
    ).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
