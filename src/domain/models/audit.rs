use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only audit record for availability mutations. Bulk operations
/// write a single summarizing row, not one per date.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: String,
    pub actor_id: Option<String>,
    pub payload_json: String,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(action: &str, actor_id: Option<String>, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            actor_id,
            payload_json: payload.to_string(),
            created_at: Utc::now(),
        }
    }
}
