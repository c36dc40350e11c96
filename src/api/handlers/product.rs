use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::CreateProductRequest;
use crate::domain::models::product::{NewProductParams, Product};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.slug.is_empty() {
        return Err(AppError::Validation("Slug must not be empty".into()));
    }
    if payload.price_cents < 0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }

    let product = Product::new(NewProductParams {
        slug: payload.slug,
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        price_cents: payload.price_cents,
        currency: payload.currency.unwrap_or_else(|| "eur".to_string()),
        stripe_price_id: payload.stripe_price_id,
        slot_duration_min: payload.slot_duration_min.unwrap_or(60),
        offer_window_hours: payload.offer_window_hours.unwrap_or(24),
        booking_config: payload.booking_config.unwrap_or_default(),
    });

    let created = state.product_repo.create(&product).await?;
    info!("Product created: {} ({})", created.slug, created.id);
    Ok(Json(created))
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.product_repo.list().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Product not found".into()))?;
    Ok(Json(product))
}
