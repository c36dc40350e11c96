use crate::domain::{
    models::booking_request::{BookingRequest, BookingTarget, Identity},
    ports::BookingRequestRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresBookingRequestRepo {
    pool: PgPool,
}

impl PostgresBookingRequestRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl BookingRequestRepository for PostgresBookingRequestRepo {
    async fn create(&self, request: &BookingRequest) -> Result<BookingRequest, AppError> {
        sqlx::query_as::<_, BookingRequest>(
            "INSERT INTO booking_requests (id, product_id, campaign_id, campaign_card_index, user_id, visitor_id, event_date, timezone, stage, offer_expires_at, selected_time, checkout_session_id, last_seen_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
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
        sqlx::query_as::<_, BookingRequest>("SELECT * FROM booking_requests WHERE id = $1")
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
             WHERE event_date = $1
               AND COALESCE(product_id, '') = COALESCE($2, '')
               AND COALESCE(campaign_id, '') = COALESCE($3, '')
               AND COALESCE(campaign_card_index, -1) = COALESCE($4, -1)
               AND COALESCE(user_id, '') = COALESCE($5, '')
               AND COALESCE(visitor_id, '') = COALESCE($6, '')
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
             SET stage=$1, selected_time=$2, checkout_session_id=$3, last_seen_at=$4
             WHERE id=$5
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
