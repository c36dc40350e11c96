use crate::domain::{models::slot_hold::BookingSlotHold, ports::SlotHoldRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresSlotHoldRepo {
    pool: PgPool,
}

impl PostgresSlotHoldRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl SlotHoldRepository for PostgresSlotHoldRepo {
    async fn find_blocking(&self, product_id: &str, event_date: NaiveDate, start_time: &str) -> Result<Option<BookingSlotHold>, AppError> {
        sqlx::query_as::<_, BookingSlotHold>(
            "SELECT * FROM booking_slot_holds
             WHERE product_id = $1 AND event_date = $2 AND start_time = $3 AND status IN ('ACTIVE', 'CONVERTED')
             LIMIT 1"
        )
            .bind(product_id)
            .bind(event_date)
            .bind(start_time)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create(&self, hold: &BookingSlotHold) -> Result<BookingSlotHold, AppError> {
        sqlx::query_as::<_, BookingSlotHold>(
            "INSERT INTO booking_slot_holds (id, booking_request_id, product_id, event_date, start_time, end_time, status, expires_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&hold.id).bind(&hold.booking_request_id).bind(&hold.product_id)
            .bind(hold.event_date).bind(&hold.start_time).bind(&hold.end_time)
            .bind(&hold.status).bind(hold.expires_at).bind(hold.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BookingSlotHold>, AppError> {
        sqlx::query_as::<_, BookingSlotHold>("SELECT * FROM booking_slot_holds WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_expired(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("UPDATE booking_slot_holds SET status = 'EXPIRED' WHERE id = $1 AND status = 'ACTIVE'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Active hold not found".into()));
        }
        Ok(())
    }

    async fn mark_converted(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("UPDATE booking_slot_holds SET status = 'CONVERTED' WHERE id = $1 AND status = 'ACTIVE'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Active hold not found".into()));
        }
        Ok(())
    }
}
