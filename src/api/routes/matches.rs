use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{run_blocking, ApiError};
use crate::models::{Match, PlayerId};

#[derive(Debug, Deserialize)]
pub struct ReportMatchRequest {
    pub winner: PlayerId,
    pub loser: PlayerId,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<Match>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ReportedMatch {
    pub winner: PlayerId,
    pub loser: PlayerId,
}

pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let matches = run_blocking(move || state.tournament.matches()).await?;
    Ok(Json(MatchListResponse {
        count: matches.len(),
        matches,
    }))
}

pub async fn report_match(
    State(state): State<AppState>,
    Json(request): Json<ReportMatchRequest>,
) -> Result<(StatusCode, Json<ReportedMatch>), ApiError> {
    let ReportMatchRequest { winner, loser } = request;
    run_blocking(move || state.tournament.report_match(winner, loser)).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReportedMatch { winner, loser }),
    ))
}

pub async fn delete_matches(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    run_blocking(move || state.tournament.delete_matches()).await?;
    Ok(StatusCode::NO_CONTENT)
}
