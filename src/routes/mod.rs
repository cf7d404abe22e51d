//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The transport layer is a thin adapter: routing, identity extraction, and
//! status-code mapping live here, while all admission and prompt logic stays
//! in the service layer. Auth is stubbed upstream — handlers trust the
//! identity headers the platform injects.

pub mod chat;
pub mod game;
pub mod identity;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/api/game/views", get(game::views))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
