use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{run_blocking, ApiError};
use crate::models::{Pairing, StandingEntry, StandingsOrder};

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub order: StandingsOrder,
    pub standings: Vec<StandingEntry>,
}

#[derive(Debug, Serialize)]
pub struct PairingsResponse {
    pub pairings: Vec<Pairing>,
}

pub async fn player_standings(
    State(state): State<AppState>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let order = state.tournament.order();
    let standings = run_blocking(move || state.tournament.player_standings()).await?;
    Ok(Json(StandingsResponse { order, standings }))
}

pub async fn swiss_pairings(
    State(state): State<AppState>,
) -> Result<Json<PairingsResponse>, ApiError> {
    let pairings = run_blocking(move || state.tournament.swiss_pairings()).await?;
    Ok(Json(PairingsResponse { pairings }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{send, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_standings_endpoint() {
        let (app, tournament) = test_app();
        let a = tournament.register_player("Ada").unwrap();
        let b = tournament.register_player("Grace").unwrap();
        tournament.register_player("Linus").unwrap();
        tournament.report_match(b, a).unwrap();

        let (status, json) = send(app, "GET", "/api/standings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["order"], "descending");

        let standings = json["standings"].as_array().unwrap();
        assert_eq!(standings.len(), 3);
        assert_eq!(standings[0]["name"], "Grace");
        assert_eq!(standings[0]["wins"], 1);
        assert_eq!(standings[0]["matches"], 1);
        assert_eq!(standings[2]["name"], "Linus");
        assert_eq!(standings[2]["matches"], 0);
    }

    #[tokio::test]
    async fn test_pairings_endpoint() {
        let (app, tournament) = test_app();
        for name in ["A", "B", "C", "D"] {
            tournament.register_player(name).unwrap();
        }

        let (status, json) = send(app, "GET", "/api/pairings", None).await;
        assert_eq!(status, StatusCode::OK);

        let pairings = json["pairings"].as_array().unwrap();
        assert_eq!(pairings.len(), 2);
        assert_eq!(pairings[0]["name1"], "A");
        assert_eq!(pairings[0]["name2"], "B");
        assert_eq!(pairings[1]["id1"], 3);
        assert_eq!(pairings[1]["id2"], 4);
    }

    #[tokio::test]
    async fn test_pairings_endpoint_odd_count() {
        let (app, tournament) = test_app();
        for name in ["A", "B", "C"] {
            tournament.register_player(name).unwrap();
        }

        let (status, json) = send(app, "GET", "/api/pairings", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "ODD_PLAYER_COUNT");
    }
}
