mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{parse_body, TestApp};
use serde_json::json;
use uuid::Uuid;

async fn apply_preset(app: &TestApp, preset: &str, start: &str, end: &str) -> serde_json::Value {
    let res = app.request(
        "POST",
        "/api/v1/admin/overrides/preset",
        Some(&app.admin_cookie()),
        Some(json!({
            "preset": preset,
            "start_date": start,
            "end_date": end,
            "daily_capacity": 1
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

async fn list_overrides(app: &TestApp, start: &str, end: &str) -> Vec<serde_json::Value> {
    let res = app.request(
        "GET",
        &format!("/api/v1/admin/overrides?start={}&end={}", start, end),
        Some(&app.admin_cookie()),
        None,
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await.as_array().unwrap().clone()
}

async fn insert_confirmed_booking(app: &TestApp, date: &str) {
    sqlx::query(
        "INSERT INTO bookings (id, event_date, start_time, end_time, status, checkout_session_id, created_at)
         VALUES (?, ?, '10:00', '11:00', 'CONFIRMED', ?, ?)"
    )
        .bind(Uuid::new_v4().to_string())
        .bind(date)
        .bind(format!("cs_seed_{}", Uuid::new_v4().simple()))
        .bind(Utc::now())
        .execute(&app.pool)
        .await
        .unwrap();
}

// 2030-01-07 is a Monday; the week runs Mon..Sun through 2030-01-13.

#[tokio::test]
async fn test_weekdays_preset_over_one_week() {
    let app = TestApp::new().await;

    let result = apply_preset(&app, "weekdays-available", "2030-01-07", "2030-01-13").await;
    assert_eq!(result["applied"], 7);
    assert_eq!(result["skipped"], 0);

    let overrides = list_overrides(&app, "2030-01-07", "2030-01-13").await;
    let available = overrides.iter().filter(|o| o["status"] == "AVAILABLE").count();
    let limited = overrides.iter().filter(|o| o["status"] == "LIMITED").count();
    assert_eq!(available, 4, "Mon-Thu should be available");
    assert_eq!(limited, 3, "Fri-Sun should be limited");

    // Status-only on the available block, capacity on the limited block
    assert!(overrides.iter()
        .filter(|o| o["status"] == "AVAILABLE")
        .all(|o| o["capacity_override"].is_null()));
    assert!(overrides.iter()
        .filter(|o| o["status"] == "LIMITED")
        .all(|o| o["capacity_override"] == 1));
}

#[tokio::test]
async fn test_weekends_preset_mirrors() {
    let app = TestApp::new().await;

    let result = apply_preset(&app, "weekends-available", "2030-01-07", "2030-01-13").await;
    assert_eq!(result["applied"], 7);

    let overrides = list_overrides(&app, "2030-01-07", "2030-01-13").await;
    assert_eq!(overrides.iter().filter(|o| o["status"] == "AVAILABLE").count(), 3);
    assert_eq!(overrides.iter().filter(|o| o["status"] == "LIMITED").count(), 4);
}

#[tokio::test]
async fn test_protected_dates_are_skipped() {
    let app = TestApp::new().await;

    insert_confirmed_booking(&app, "2030-01-08").await;

    let result = apply_preset(&app, "weekdays-available", "2030-01-07", "2030-01-13").await;
    assert_eq!(result["applied"], 6);
    assert_eq!(result["skipped"], 1);

    let overrides = list_overrides(&app, "2030-01-07", "2030-01-13").await;
    assert_eq!(overrides.len(), 6);
    assert!(overrides.iter().all(|o| o["date"] != "2030-01-08"));
}

#[tokio::test]
async fn test_reset_clears_the_range() {
    let app = TestApp::new().await;

    apply_preset(&app, "weekdays-available", "2030-01-07", "2030-01-13").await;
    assert_eq!(list_overrides(&app, "2030-01-07", "2030-01-13").await.len(), 7);

    let result = apply_preset(&app, "reset", "2030-01-07", "2030-01-13").await;
    assert_eq!(result["applied"], 0);
    assert_eq!(result["skipped"], 0);

    assert!(list_overrides(&app, "2030-01-07", "2030-01-13").await.is_empty());
}

#[tokio::test]
async fn test_preset_replaces_previous_overrides() {
    let app = TestApp::new().await;

    apply_preset(&app, "weekdays-available", "2030-01-07", "2030-01-13").await;
    apply_preset(&app, "weekends-available", "2030-01-07", "2030-01-13").await;

    // No duplicates: the second apply replaced the first batch wholesale
    let overrides = list_overrides(&app, "2030-01-07", "2030-01-13").await;
    assert_eq!(overrides.len(), 7);
    assert_eq!(overrides.iter().filter(|o| o["status"] == "AVAILABLE").count(), 3);
}

#[tokio::test]
async fn test_bulk_apply_writes_one_audit_row() {
    let app = TestApp::new().await;

    apply_preset(&app, "weekdays-available", "2030-01-07", "2030-01-13").await;

    let res = app.request("GET", "/api/v1/admin/audit-log", Some(&app.admin_cookie()), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let entries = parse_body(res).await;
    let entries = entries.as_array().unwrap();

    let preset_rows: Vec<_> = entries.iter()
        .filter(|e| e["action"] == "override.preset_apply")
        .collect();
    assert_eq!(preset_rows.len(), 1, "bulk apply must write exactly one audit row");

    let payload: serde_json::Value =
        serde_json::from_str(preset_rows[0]["payload_json"].as_str().unwrap()).unwrap();
    assert_eq!(payload["applied"], 7);
    assert_eq!(payload["skipped"], 0);
}

#[tokio::test]
async fn test_unknown_preset_is_rejected() {
    let app = TestApp::new().await;

    let res = app.request(
        "POST",
        "/api/v1/admin/overrides/preset",
        Some(&app.admin_cookie()),
        Some(json!({
            "preset": "everything-free",
            "start_date": "2030-01-07",
            "end_date": "2030-01-13"
        })),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
