pub mod health;
pub mod positions;
pub mod trades;

use crate::service::TradeHistoryService;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TradeHistoryService>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/trades", get(trades::get_trades))
        .route("/v1/positions", get(positions::get_positions))
        .layer(cors)
        .with_state(state)
}
