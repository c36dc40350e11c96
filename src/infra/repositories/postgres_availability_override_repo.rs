use crate::domain::{models::availability_override::AvailabilityOverride, ports::AvailabilityOverrideRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresAvailabilityOverrideRepo {
    pool: PgPool,
}

impl PostgresAvailabilityOverrideRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

const INSERT_SQL: &str =
    "INSERT INTO availability_overrides (id, product_id, date, start_at, end_at, status, capacity_override, reason, created_by, created_at)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)";

const INSERT_RETURNING_SQL: &str =
    "INSERT INTO availability_overrides (id, product_id, date, start_at, end_at, status, capacity_override, reason, created_by, created_at)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
     RETURNING *";

#[async_trait]
impl AvailabilityOverrideRepository for PostgresAvailabilityOverrideRepo {
    async fn upsert(&self, entity: &AvailabilityOverride) -> Result<AvailabilityOverride, AppError> {
        // Whole-day rows replace an existing row for the same scope and
        // date; partial-day rows are plain inserts.
        if let Some(date) = entity.date
            && let Some(existing) = self.find_for_date(entity.product_id.as_deref(), date).await? {
            return sqlx::query_as::<_, AvailabilityOverride>(
                "UPDATE availability_overrides
                 SET status=$1, capacity_override=$2, reason=$3, created_by=$4
                 WHERE id=$5
                 RETURNING *"
            )
                .bind(&entity.status).bind(entity.capacity_override)
                .bind(&entity.reason).bind(&entity.created_by)
                .bind(&existing.id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database);
        }

        sqlx::query_as::<_, AvailabilityOverride>(INSERT_RETURNING_SQL)
            .bind(&entity.id).bind(&entity.product_id).bind(entity.date)
            .bind(entity.start_at).bind(entity.end_at).bind(&entity.status)
            .bind(entity.capacity_override).bind(&entity.reason)
            .bind(&entity.created_by).bind(entity.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AvailabilityOverride>, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>("SELECT * FROM availability_overrides WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_for_date(&self, product_id: Option<&str>, date: NaiveDate) -> Result<Option<AvailabilityOverride>, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>(
            "SELECT * FROM availability_overrides
             WHERE COALESCE(product_id, '') = COALESCE($1, '') AND date = $2"
        )
            .bind(product_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, product_id: Option<&str>, start: NaiveDate, end: NaiveDate) -> Result<Vec<AvailabilityOverride>, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>(
            "SELECT * FROM availability_overrides
             WHERE COALESCE(product_id, '') = COALESCE($1, '') AND date >= $2 AND date <= $3
             ORDER BY date ASC"
        )
            .bind(product_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM availability_overrides WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Override not found".into()));
        }
        Ok(())
    }

    async fn replace_range(
        &self,
        product_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
        rows: &[AvailabilityOverride],
    ) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let res = sqlx::query(
            "DELETE FROM availability_overrides
             WHERE COALESCE(product_id, '') = COALESCE($1, '') AND date >= $2 AND date <= $3"
        )
            .bind(product_id)
            .bind(start)
            .bind(end)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for row in rows {
            sqlx::query(INSERT_SQL)
                .bind(&row.id).bind(&row.product_id).bind(row.date)
                .bind(row.start_at).bind(row.end_at).bind(&row.status)
                .bind(row.capacity_override).bind(&row.reason)
                .bind(&row.created_by).bind(row.created_at)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(res.rows_affected())
    }
}
