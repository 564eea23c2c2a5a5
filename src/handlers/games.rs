use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::errors::Result;
use crate::models::game::{Game, PhaseGames};
use crate::models::phase::Phase;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GameQuery {
    pub phase: Option<Phase>,
    pub group: Option<String>,
}

// Match catalog grouped by phase, in tournament order
pub async fn get_games(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Json<Vec<PhaseGames>>> {
    let start_time = std::time::Instant::now();
    let games = state.catalog.games().await?;

    let grouped: Vec<PhaseGames> = Phase::ALL
        .iter()
        .filter(|phase| query.phase.map_or(true, |wanted| wanted == **phase))
        .map(|phase| {
            let mut phase_games: Vec<Game> = games
                .iter()
                .filter(|g| g.phase == *phase)
                .filter(|g| {
                    query
                        .group
                        .as_deref()
                        .map_or(true, |wanted| g.group.as_deref() == Some(wanted))
                })
                .cloned()
                .collect();
            phase_games.sort_by_key(|g| g.match_id);
            PhaseGames {
                phase: *phase,
                games: phase_games,
            }
        })
        .filter(|section| !section.games.is_empty())
        .collect();

    tracing::debug!(
        "Served {} phases of matches in {:?}",
        grouped.len(),
        start_time.elapsed()
    );
    Ok(Json(grouped))
}

pub async fn get_game_by_id(
    State(state): State<AppState>,
    Path(match_id): Path<u32>,
) -> Result<Json<Game>> {
    Ok(Json(state.catalog.game(match_id).await?))
}
