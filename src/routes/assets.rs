use axum::extract::State;
use axum::{Json, Router};
use axum::routing::get;
use http::StatusCode;
use tracing::{info, error};

use crate::errors::AppError;
use crate::models::{AssetCreated, AssetSummary, NewAsset};
use crate::payload::Payload;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assets).post(create_asset))
}

pub async fn list_assets(
    State(state): State<AppState>
) -> Result<Json<Vec<AssetSummary>>, AppError> {
    info!("GET /assets - Fetching all assets");
    let assets = state.store.list_assets().await
        .map_err(|e| {
            error!("Failed to fetch assets: {}", e);
            e
        })?;
    Ok(Json(assets.into_iter().map(AssetSummary::from).collect()))
}

pub async fn create_asset(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<(StatusCode, Json<AssetCreated>), AppError> {
    info!("POST /assets - Creating new asset");
    let input = NewAsset::from_payload(&payload)?;
    let asset = state.store.create_asset(input).await
        .map_err(|e| {
            error!("Failed to create asset: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(asset.into())))
}
