use axum::extract::State;
use axum::{Json, Router};
use axum::routing::get;
use http::StatusCode;
use tracing::{info, error};

use crate::errors::AppError;
use crate::models::{NewPortfolio, PortfolioCreated, PortfolioSummary};
use crate::payload::Payload;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fetch_portfolios).post(create_portfolio))
}

pub async fn fetch_portfolios(
    State(state): State<AppState>
) -> Result<Json<Vec<PortfolioSummary>>, AppError> {
    info!("GET /portfolios - Fetching all portfolios");
    let portfolios = state.store.list_portfolios().await
        .map_err(|e| {
            error!("Failed to fetch portfolios: {}", e);
            e
        })?;
    Ok(Json(portfolios.into_iter().map(PortfolioSummary::from).collect()))
}

// No ownership check: any caller may create a portfolio for any user id.
pub async fn create_portfolio(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<(StatusCode, Json<PortfolioCreated>), AppError> {
    info!("POST /portfolios - Creating new portfolio");
    let input = NewPortfolio::from_payload(&payload)?;
    let portfolio = state.store.create_portfolio(input).await
        .map_err(|e| {
            error!("Failed to create portfolio: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(portfolio.into())))
}
