//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON market-data API, the lobby websocket, and the
//! dashboard shell under a single Axum router. Anything else is served from
//! `SITE_DIR`, which is where the WASM bundle (`/pkg`) and the optional
//! `/service-worker.js` live.

pub mod prices;
pub mod shell;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let static_files = ServeDir::new(&state.site_dir);

    Router::new()
        .route("/", get(shell::index))
        .route("/localhost", get(shell::index))
        .route("/api/currencies", get(prices::currencies))
        .route("/api/exchange-rates", get(prices::exchange_rates))
        .route("/api/prices/historic", get(prices::historic_prices))
        .route("/api/prices/{pair}/{kind}", get(prices::price))
        .route("/api/time", get(prices::time))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
