use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use chrono::NaiveDate;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, booking_request_id, product_id, campaign_id, event_date, start_time, end_time, status, checkout_session_id, payment_intent, amount_paid_cents, currency, customer_name, customer_email, user_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.booking_request_id).bind(&booking.product_id)
            .bind(&booking.campaign_id).bind(booking.event_date).bind(&booking.start_time)
            .bind(&booking.end_time).bind(&booking.status).bind(&booking.checkout_session_id)
            .bind(&booking.payment_intent).bind(booking.amount_paid_cents).bind(&booking.currency)
            .bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.user_id)
            .bind(booking.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_checkout_session(&self, session_id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE checkout_session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_date_range(&self, product_id: Option<&str>, start: NaiveDate, end: NaiveDate) -> Result<Vec<(NaiveDate, i64)>, AppError> {
        let rows = sqlx::query(
            "SELECT event_date, COUNT(*) as count FROM bookings
             WHERE (? IS NULL OR product_id = ?)
               AND event_date >= ? AND event_date <= ? AND status = 'CONFIRMED'
             GROUP BY event_date"
        )
            .bind(product_id)
            .bind(product_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(rows.iter()
            .map(|r| (r.get::<NaiveDate, _>("event_date"), r.get::<i64, _>("count")))
            .collect())
    }

    async fn booked_dates_in_range(&self, product_id: Option<&str>, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, AppError> {
        let rows = sqlx::query(
            "SELECT DISTINCT event_date FROM bookings
             WHERE (? IS NULL OR product_id = ?)
               AND event_date >= ? AND event_date <= ? AND status = 'CONFIRMED'"
        )
            .bind(product_id)
            .bind(product_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(rows.iter().map(|r| r.get::<NaiveDate, _>("event_date")).collect())
    }
}
