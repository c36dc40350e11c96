use crate::domain::{models::audit::AuditLogEntry, ports::AuditLogRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAuditLogRepo {
    pool: SqlitePool,
}

impl SqliteAuditLogRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl AuditLogRepository for SqliteAuditLogRepo {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO availability_audit_log (id, action, actor_id, payload_json, created_at)
             VALUES (?, ?, ?, ?, ?)"
        )
            .bind(&entry.id).bind(&entry.action).bind(&entry.actor_id)
            .bind(&entry.payload_json).bind(entry.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list(&self, limit: i64) -> Result<Vec<AuditLogEntry>, AppError> {
        sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM availability_audit_log ORDER BY created_at DESC LIMIT ?"
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
