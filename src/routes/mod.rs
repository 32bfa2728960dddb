//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the websocket board session and the read-only REST endpoints under a
//! single Axum router. CORS is open: the board page may be served from a
//! different origin than this service.

pub mod board;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ws", get(ws::handle_ws))
        .route("/api/board", get(board::get_board))
        .route("/api/triage", get(board::get_triage))
        .route("/api/color", get(board::get_color))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
