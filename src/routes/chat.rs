//! Chat route — admission-controlled proxy to the LLM backend.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::error;

use crate::services::chat::{Caller, ChatError, ChatErrorKind, RateInfo, handle_chat};
use crate::state::AppState;

/// `POST /api/chat` — answer a question through the admission pipeline.
pub async fn chat(State(state): State<AppState>, caller: Caller, Json(body): Json<Value>) -> Response {
    match handle_chat(&state, &caller, body.get("question")).await {
        Ok(reply) => (rate_limit_headers(&reply.rate), Json(json!({ "answer": reply.answer }))).into_response(),
        Err(e) => chat_error_response(&state, &e),
    }
}

/// Rate-limit metadata rides on every response, success or failure.
fn rate_limit_headers(rate: &RateInfo) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let entries = [
        ("x-ratelimit-limit", rate.limit.to_string()),
        ("x-ratelimit-remaining", rate.remaining.to_string()),
        ("x-ratelimit-reset", rate.reset_at.to_string()),
    ];
    for (name, value) in entries {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
    headers
}

fn chat_error_response(state: &AppState, err: &ChatError) -> Response {
    let headers = err.rate.as_ref().map(rate_limit_headers).unwrap_or_default();
    let (status, body) = match &err.kind {
        ChatErrorKind::RateLimited { remaining, reset_at, .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": err.kind.to_string(), "remaining": remaining, "resetTime": reset_at }),
        ),
        ChatErrorKind::MissingQuestion | ChatErrorKind::ForbiddenInput | ChatErrorKind::TooShort => {
            (StatusCode::BAD_REQUEST, json!({ "error": err.kind.to_string() }))
        }
        ChatErrorKind::QuotaExhausted { remaining, reset_at } => (
            StatusCode::PAYMENT_REQUIRED,
            json!({ "error": err.kind.to_string(), "remainingTokens": remaining, "resetTime": reset_at }),
        ),
        ChatErrorKind::Llm(e) => {
            error!(error = %e, "chat: backend failure");
            // Real failure detail is for operators; callers get a fixed
            // message unless debug mode is on.
            let message = if state.config.debug { e.to_string() } else { "LLM error".to_string() };
            (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
        }
    };
    (status, headers, Json(body)).into_response()
}
