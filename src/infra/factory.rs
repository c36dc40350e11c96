use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::automation::http_relay::HttpAutomationRelay;
use crate::infra::payments::stripe_gateway::StripeCheckoutGateway;
use crate::infra::repositories::{
    postgres_audit_log_repo::PostgresAuditLogRepo,
    postgres_availability_override_repo::PostgresAvailabilityOverrideRepo,
    postgres_availability_rule_repo::PostgresAvailabilityRuleRepo,
    postgres_booking_repo::PostgresBookingRepo,
    postgres_booking_request_repo::PostgresBookingRequestRepo,
    postgres_dashboard_repo::PostgresDashboardRepo,
    postgres_product_repo::PostgresProductRepo,
    postgres_slot_hold_repo::PostgresSlotHoldRepo,
    sqlite_audit_log_repo::SqliteAuditLogRepo,
    sqlite_availability_override_repo::SqliteAvailabilityOverrideRepo,
    sqlite_availability_rule_repo::SqliteAvailabilityRuleRepo,
    sqlite_booking_repo::SqliteBookingRepo,
    sqlite_booking_request_repo::SqliteBookingRequestRepo,
    sqlite_dashboard_repo::SqliteDashboardRepo,
    sqlite_product_repo::SqliteProductRepo,
    sqlite_slot_hold_repo::SqliteSlotHoldRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let payment_gateway = Arc::new(StripeCheckoutGateway::new(
        config.stripe_api_url.clone(),
        config.stripe_secret_key.clone(),
    ));
    let automation_relay = Arc::new(HttpAutomationRelay::new(
        config.automation_webhook_url.clone(),
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            product_repo: Arc::new(PostgresProductRepo::new(pool.clone())),
            rule_repo: Arc::new(PostgresAvailabilityRuleRepo::new(pool.clone())),
            override_repo: Arc::new(PostgresAvailabilityOverrideRepo::new(pool.clone())),
            audit_repo: Arc::new(PostgresAuditLogRepo::new(pool.clone())),
            request_repo: Arc::new(PostgresBookingRequestRepo::new(pool.clone())),
            hold_repo: Arc::new(PostgresSlotHoldRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            dashboard_repo: Arc::new(PostgresDashboardRepo::new(pool)),
            payment_gateway,
            automation_relay,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            product_repo: Arc::new(SqliteProductRepo::new(pool.clone())),
            rule_repo: Arc::new(SqliteAvailabilityRuleRepo::new(pool.clone())),
            override_repo: Arc::new(SqliteAvailabilityOverrideRepo::new(pool.clone())),
            audit_repo: Arc::new(SqliteAuditLogRepo::new(pool.clone())),
            request_repo: Arc::new(SqliteBookingRequestRepo::new(pool.clone())),
            hold_repo: Arc::new(SqliteSlotHoldRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            dashboard_repo: Arc::new(SqliteDashboardRepo::new(pool)),
            payment_gateway,
            automation_relay,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
