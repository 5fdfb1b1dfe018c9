//! REST API endpoints.
//!
//! Axum-based HTTP API for registering players, reporting results and
//! reading standings and next-round pairings.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::calculate::PairingError;
use crate::storage::StoreError;
use crate::tournament::TournamentError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "ODD_PLAYER_COUNT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        match err {
            TournamentError::Store(StoreError::UnknownPlayer(id)) => {
                ApiError::NotFound(format!("player {}", id))
            }
            TournamentError::Store(
                e @ (StoreError::PlayersReferenced { .. } | StoreError::ConstraintViolation(_)),
            ) => ApiError::Conflict(e.to_string()),
            TournamentError::Store(e) => ApiError::Internal(e.to_string()),
            TournamentError::Pairing(e @ PairingError::OddPlayerCount(_)) => {
                ApiError::Unprocessable(e.to_string())
            }
            e @ TournamentError::InvalidName(_) => ApiError::BadRequest(e.to_string()),
        }
    }
}

/// Run a tournament operation on tokio's blocking pool.
///
/// Store calls do synchronous file I/O and take blocking locks, so they stay
/// off the async worker threads.
pub async fn run_blocking<T, F>(operation: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, TournamentError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Build the application router.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = match cors_origin {
        "*" => CorsLayer::new().allow_origin(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => CorsLayer::new().allow_origin(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                CorsLayer::new()
            }
        },
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        .route(
            "/api/players",
            get(routes::players::list_players)
                .post(routes::players::register_player)
                .delete(routes::players::delete_players),
        )
        .route("/api/players/count", get(routes::players::count_players))
        .route(
            "/api/matches",
            get(routes::matches::list_matches)
                .post(routes::matches::report_match)
                .delete(routes::matches::delete_matches),
        )
        .route("/api/standings", get(routes::standings::player_standings))
        .route("/api/pairings", get(routes::standings::swiss_pairings))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
