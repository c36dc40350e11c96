use crate::domain::{models::availability_rule::AvailabilityRule, ports::AvailabilityRuleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteAvailabilityRuleRepo {
    pool: SqlitePool,
}

impl SqliteAvailabilityRuleRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl AvailabilityRuleRepository for SqliteAvailabilityRuleRepo {
    async fn create(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "INSERT INTO availability_rules (id, product_id, timezone, workdays_mask, start_time, end_time, slot_minutes, buffer_minutes, capacity_type, daily_capacity, slot_capacity, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&rule.id).bind(&rule.product_id).bind(&rule.timezone).bind(rule.workdays_mask)
            .bind(&rule.start_time).bind(&rule.end_time).bind(rule.slot_minutes).bind(rule.buffer_minutes)
            .bind(&rule.capacity_type).bind(rule.daily_capacity).bind(rule.slot_capacity)
            .bind(rule.is_active).bind(rule.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "UPDATE availability_rules SET timezone=?, workdays_mask=?, start_time=?, end_time=?, slot_minutes=?, buffer_minutes=?, capacity_type=?, daily_capacity=?, slot_capacity=?, is_active=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&rule.timezone).bind(rule.workdays_mask).bind(&rule.start_time).bind(&rule.end_time)
            .bind(rule.slot_minutes).bind(rule.buffer_minutes).bind(&rule.capacity_type)
            .bind(rule.daily_capacity).bind(rule.slot_capacity).bind(rule.is_active)
            .bind(&rule.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AvailabilityRule>, AppError> {
        sqlx::query_as::<_, AvailabilityRule>("SELECT * FROM availability_rules WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_active(&self, product_id: Option<&str>) -> Result<Option<AvailabilityRule>, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "SELECT * FROM availability_rules
             WHERE COALESCE(product_id, '') = COALESCE(?, '') AND is_active = 1
             ORDER BY created_at DESC LIMIT 1"
        )
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_active(&self, product_id: Option<&str>) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM availability_rules
             WHERE COALESCE(product_id, '') = COALESCE(?, '') AND is_active = 1"
        )
            .bind(product_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }

    async fn list(&self, product_id: Option<&str>) -> Result<Vec<AvailabilityRule>, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "SELECT * FROM availability_rules
             WHERE COALESCE(product_id, '') = COALESCE(?, '')
             ORDER BY created_at DESC"
        )
            .bind(product_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
