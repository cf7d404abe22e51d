//! Game statistics route — developer-only view counts.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use crate::services::chat::Caller;
use crate::services::profile::{GameViews, Profile};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ViewsError {
    #[error("User not authenticated.")]
    NotAuthenticated,
    #[error("Only developers can access view counts.")]
    NotDeveloper,
}

fn views_error_to_status(err: &ViewsError) -> StatusCode {
    match err {
        ViewsError::NotAuthenticated => StatusCode::BAD_REQUEST,
        ViewsError::NotDeveloper => StatusCode::FORBIDDEN,
    }
}

impl IntoResponse for ViewsError {
    fn into_response(self) -> Response {
        (views_error_to_status(&self), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
pub struct ViewsResponse {
    #[serde(rename = "activeGame")]
    pub active_game: Option<String>,
    pub views: GameViews,
}

/// `GET /api/game/views` — view counts for the caller's active game.
pub async fn views(State(state): State<AppState>, caller: Caller) -> Result<Json<ViewsResponse>, ViewsError> {
    let user_id = caller.user_id.as_deref().ok_or(ViewsError::NotAuthenticated)?;
    match state.profiles.profile_of(user_id) {
        Some(Profile::Developer { active_game, views, .. }) => Ok(Json(ViewsResponse { active_game, views })),
        _ => Err(ViewsError::NotDeveloper),
    }
}

#[cfg(test)]
#[path = "game_test.rs"]
mod tests;
