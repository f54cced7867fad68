use axum::extract::{Query, State};
use axum::{Json, Router};
use axum::routing::get;
use http::StatusCode;
use tracing::{info, error};

use crate::errors::AppError;
use crate::models::{HoldingCreated, HoldingQuery, HoldingSummary, NewHolding};
use crate::payload::Payload;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_holdings).post(create_holding))
}

pub async fn list_holdings(
    State(state): State<AppState>,
    Query(query): Query<HoldingQuery>,
) -> Result<Json<Vec<HoldingSummary>>, AppError> {
    let portfolio_id = match query.portfolio_id.as_deref().map(str::trim) {
        None | Some("") => return Err(AppError::Validation("portfolio_id required".into())),
        Some(raw) => raw.parse::<i32>()
            .map_err(|_| AppError::Validation("portfolio_id must be an integer id".into()))?,
    };
    info!("GET /holdings?portfolio_id={} - Fetching holdings", portfolio_id);

    let holdings = state.store.list_holdings(portfolio_id).await
        .map_err(|e| {
            error!("Failed to fetch holdings for portfolio {}: {}", portfolio_id, e);
            e
        })?;
    Ok(Json(holdings.into_iter().map(HoldingSummary::from).collect()))
}

pub async fn create_holding(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<(StatusCode, Json<HoldingCreated>), AppError> {
    info!("POST /holdings - Creating new holding");
    let input = NewHolding::from_payload(&payload)?;
    let (portfolio_id, asset_id) = (input.portfolio_id, input.asset_id);
    let holding = state.store.create_holding(input).await
        .map_err(|e| {
            error!("Failed to create holding ({}, {}): {}", portfolio_id, asset_id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(holding.into())))
}
