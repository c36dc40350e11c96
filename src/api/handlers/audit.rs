use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::AuditLogQuery;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<AuditLogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let entries = state.audit_repo.list(limit).await?;
    Ok(Json(entries))
}
