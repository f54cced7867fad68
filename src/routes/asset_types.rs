use axum::extract::State;
use axum::{Json, Router};
use axum::routing::get;
use http::StatusCode;
use tracing::{info, error};

use crate::errors::AppError;
use crate::models::{AssetTypeCreated, AssetTypeSummary, NewAssetType};
use crate::payload::Payload;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_asset_types).post(create_asset_type))
}

pub async fn list_asset_types(
    State(state): State<AppState>
) -> Result<Json<Vec<AssetTypeSummary>>, AppError> {
    info!("GET /asset_types - Fetching all asset types");
    let asset_types = state.store.list_asset_types().await
        .map_err(|e| {
            error!("Failed to fetch asset types: {}", e);
            e
        })?;
    Ok(Json(asset_types.into_iter().map(AssetTypeSummary::from).collect()))
}

pub async fn create_asset_type(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<(StatusCode, Json<AssetTypeCreated>), AppError> {
    info!("POST /asset_types - Creating new asset type");
    let input = NewAssetType::from_payload(&payload)?;
    let asset_type = state.store.create_asset_type(input).await
        .map_err(|e| {
            error!("Failed to create asset type: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(asset_type.into())))
}
