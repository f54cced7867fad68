use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

// Never touches the store.
async fn health() -> Json<Value> {
    info!("GET /health - Health check");
    Json(json!({ "status": "ok" }))
}
