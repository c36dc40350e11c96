use studio_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::auth::Claims,
    domain::models::payment::{CheckoutSession, CheckoutSessionParams},
    domain::ports::{AutomationRelay, PaymentGateway},
    error::AppError,
    infra::payments::signature::compute_signature,
    infra::repositories::{
        sqlite_audit_log_repo::SqliteAuditLogRepo,
        sqlite_availability_override_repo::SqliteAvailabilityOverrideRepo,
        sqlite_availability_rule_repo::SqliteAvailabilityRuleRepo,
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_booking_request_repo::SqliteBookingRequestRepo,
        sqlite_dashboard_repo::SqliteDashboardRepo,
        sqlite_product_repo::SqliteProductRepo,
        sqlite_slot_hold_repo::SqliteSlotHoldRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const WEBHOOK_SECRET: &str = "whsec_test";

pub struct MockPaymentGateway;

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout_session(&self, _params: &CheckoutSessionParams) -> Result<CheckoutSession, AppError> {
        Ok(CheckoutSession {
            id: format!("cs_test_{}", Uuid::new_v4().simple()),
            url: "https://checkout.example/session".to_string(),
        })
    }
}

pub struct MockAutomationRelay;

#[async_trait]
impl AutomationRelay for MockAutomationRelay {
    async fn booking_confirmed(&self, _payload: &Value) -> Result<(), AppError> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            frontend_url: "http://localhost:3001".to_string(),
            stripe_api_url: "http://localhost".to_string(),
            stripe_secret_key: "sk_test".to_string(),
            stripe_webhook_secret: WEBHOOK_SECRET.to_string(),
            automation_webhook_url: "http://localhost".to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_audience: "studio-frontend".to_string(),
            checkout_hold_minutes: 15,
            default_offer_window_hours: 24,
        };

        let state = Arc::new(AppState {
            config: config.clone(),
            product_repo: Arc::new(SqliteProductRepo::new(pool.clone())),
            rule_repo: Arc::new(SqliteAvailabilityRuleRepo::new(pool.clone())),
            override_repo: Arc::new(SqliteAvailabilityOverrideRepo::new(pool.clone())),
            audit_repo: Arc::new(SqliteAuditLogRepo::new(pool.clone())),
            request_repo: Arc::new(SqliteBookingRequestRepo::new(pool.clone())),
            hold_repo: Arc::new(SqliteSlotHoldRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            dashboard_repo: Arc::new(SqliteDashboardRepo::new(pool.clone())),
            payment_gateway: Arc::new(MockPaymentGateway),
            automation_relay: Arc::new(MockAutomationRelay),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Mints an admin access token the way the external auth provider
    /// would, signed with the test Ed25519 key pair.
    pub fn admin_cookie(&self) -> String {
        let priv_key_pem = include_str!("keys/test_private.pem");
        let encoding_key = EncodingKey::from_ed_pem(priv_key_pem.as_bytes())
            .expect("Invalid test private key");

        let claims = Claims {
            sub: "admin-1".to_string(),
            role: "ADMIN".to_string(),
            aud: "studio-frontend".to_string(),
            exp: (Utc::now().timestamp() + 3600) as usize,
        };

        let token = encode(&Header::new(Algorithm::EdDSA), &claims, &encoding_key)
            .expect("Failed to sign test token");
        format!("access_token={}", token)
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Signed webhook delivery, mimicking the payment gateway.
    pub async fn deliver_webhook(&self, body: &Value) -> axum::response::Response {
        let raw = body.to_string();
        let timestamp = Utc::now().timestamp();
        let signature = compute_signature(WEBHOOK_SECRET, timestamp, raw.as_bytes());
        let header_value = format!("t={},v1={}", timestamp, signature);

        self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/webhooks/payments")
                .header(header::CONTENT_TYPE, "application/json")
                .header("Stripe-Signature", header_value)
                .body(Body::from(raw))
                .unwrap()
        ).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
