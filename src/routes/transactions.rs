use axum::extract::State;
use axum::{Json, Router};
use axum::routing::get;
use http::StatusCode;
use tracing::{info, error};

use crate::errors::AppError;
use crate::models::{NewTransaction, TransactionCreated, TransactionSummary, RECENT_TRANSACTIONS_LIMIT};
use crate::payload::Payload;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
}

pub async fn list_transactions(
    State(state): State<AppState>
) -> Result<Json<Vec<TransactionSummary>>, AppError> {
    info!("GET /transactions - Fetching latest {} transactions", RECENT_TRANSACTIONS_LIMIT);
    let transactions = state.store.list_recent_transactions(RECENT_TRANSACTIONS_LIMIT).await
        .map_err(|e| {
            error!("Failed to fetch transactions: {}", e);
            e
        })?;
    Ok(Json(transactions.into_iter().map(TransactionSummary::from).collect()))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<(StatusCode, Json<TransactionCreated>), AppError> {
    info!("POST /transactions - Recording new transaction");
    let input = NewTransaction::from_payload(&payload)?;
    let transaction = state.store.create_transaction(input).await
        .map_err(|e| {
            error!("Failed to record transaction: {}", e);
            e
        })?;
    info!("Recorded {} transaction {}", transaction.kind, transaction.id);
    Ok((StatusCode::CREATED, Json(transaction.into())))
}
