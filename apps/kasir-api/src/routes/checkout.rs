//! Checkout endpoint.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use kasir_core::{CheckoutItem, Transaction};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkout", post(checkout))
}

async fn checkout(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let transaction = state.db.transactions().checkout(&request.items).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
