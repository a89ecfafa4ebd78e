//! Product catalog endpoints.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use kasir_core::validation::{validate_id, validate_new_product};
use kasir_core::{NewProduct, Product};
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Catalog routes under `/api/products`, also served at the legacy
/// `/api/produk` path.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/produk", product_routes())
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list().await?;
    Ok(Json(products))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    validate_new_product(&payload)?;

    let product = state.db.products().insert(&payload).await?;
    info!(id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Product>> {
    validate_id("id", id)?;

    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<NewProduct>,
) -> ApiResult<Json<Product>> {
    validate_id("id", id)?;
    validate_new_product(&payload)?;

    let product = state.db.products().update(id, &payload).await?;
    info!(id = id, "Product updated");
    Ok(Json(product))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    validate_id("id", id)?;

    state.db.products().delete(id).await?;
    info!(id = id, "Product deleted");
    Ok(Json(MessageResponse {
        message: "product deleted",
    }))
}
