use crate::domain::ports::DashboardRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;

pub struct PostgresDashboardRepo {
    pool: PgPool,
}

impl PostgresDashboardRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl DashboardRepository for PostgresDashboardRepo {
    async fn activate(&self, user_id: Option<&str>, customer_email: &str, booking_id: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO dashboard_activations (id, user_id, customer_email, booking_id, activated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (booking_id) DO NOTHING"
        )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(customer_email)
            .bind(booking_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
