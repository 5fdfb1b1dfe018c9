use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{run_blocking, ApiError};
use crate::models::{Player, PlayerId};

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<Player>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct PlayerCountResponse {
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPlayerRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RegisteredPlayer {
    pub id: PlayerId,
    pub name: String,
}

pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let players = run_blocking(move || state.tournament.players()).await?;
    Ok(Json(PlayerListResponse {
        count: players.len(),
        players,
    }))
}

pub async fn count_players(
    State(state): State<AppState>,
) -> Result<Json<PlayerCountResponse>, ApiError> {
    let count = run_blocking(move || state.tournament.count_players()).await?;
    Ok(Json(PlayerCountResponse { count }))
}

pub async fn register_player(
    State(state): State<AppState>,
    Json(request): Json<RegisterPlayerRequest>,
) -> Result<(StatusCode, Json<RegisteredPlayer>), ApiError> {
    let name = request.name.trim().to_string();
    let tournament = state.tournament;
    let id = run_blocking(move || tournament.register_player(&request.name)).await?;

    Ok((StatusCode::CREATED, Json(RegisteredPlayer { id, name })))
}

pub async fn delete_players(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    run_blocking(move || state.tournament.delete_players()).await?;
    Ok(StatusCode::NO_CONTENT)
}
