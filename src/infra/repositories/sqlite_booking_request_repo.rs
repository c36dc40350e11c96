use crate::domain::{
    models::booking_request::{BookingRequest, BookingTarget, Identity},
    ports::BookingRequestRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteBookingRequestRepo {
    pool: SqlitePool,
}

impl SqliteBookingRequestRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl BookingRequestRepository for SqliteBookingRequestRepo {
    async fn create(&self, request: &BookingRequest) -> Result<BookingRequest, AppError> {
        sqlx::query_as::<_, BookingRequest>(
            "INSERT INTO booking_requests (id, product_id, campaign_id, campaign_card_index, user_id, visitor_id, event_date, timezone, stage, offer_expires_at, selected_time, checkout_session_id, last_seen_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&request.id).bind(&request.product_id).bind(&request.campaign_id)
            .bind(request.campaign_card_index).bind(&request.user_id).bind(&request.visitor_id)
            .bind(request.event_date).bind(&request.timezone).bind(&request.stage)
            .bind(request.offer_expires_at).bind(&request.selected_time)
            .bind(&request.checkout_session_id).bind(request.last_seen_at).bind(request.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BookingRequest>, AppError> {
        sqlx::query_as::<_, BookingRequest>("SELECT * FROM booking_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_key(
        &self,
        target: &BookingTarget,
        identity: &Identity,
        event_date: NaiveDate,
    ) -> Result<Option<BookingRequest>, AppError> {
        let (campaign_id, card_index) = match target.campaign() {
            Some((id, idx)) => (Some(id), Some(idx)),
            None => (None, None),
        };

        sqlx::query_as::<_, BookingRequest>(
            "SELECT * FROM booking_requests
             WHERE event_date = ?
               AND COALESCE(product_id, '') = COALESCE(?, '')
               AND COALESCE(campaign_id, '') = COALESCE(?, '')
               AND COALESCE(campaign_card_index, -1) = COALESCE(?, -1)
               AND COALESCE(user_id, '') = COALESCE(?, '')
               AND COALESCE(visitor_id, '') = COALESCE(?, '')
             ORDER BY created_at DESC LIMIT 1"
        )
            .bind(event_date)
            .bind(target.product_id())
            .bind(campaign_id)
            .bind(card_index)
            .bind(identity.user_id())
            .bind(identity.visitor_id())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, request: &BookingRequest) -> Result<BookingRequest, AppError> {
        sqlx::query_as::<_, BookingRequest>(
            "UPDATE booking_requests
             SET stage=?, selected_time=?, checkout_session_id=?, last_seen_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&request.stage).bind(&request.selected_time)
            .bind(&request.checkout_session_id).bind(request.last_seen_at)
            .bind(&request.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
