use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{asset_types, assets, health, holdings, portfolios, transactions};
use crate::state::AppState;

/// Common prefix every route is registered under.
pub const API_PREFIX: &str = "/api";

pub fn create_app(state: AppState) -> Router {
    let api = Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/asset_types", asset_types::router())
        .nest("/assets", assets::router())
        .nest("/portfolios", portfolios::router())
        .nest("/holdings", holdings::router())
        .nest("/transactions", transactions::router());

    Router::new()
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
