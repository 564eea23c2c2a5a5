use axum::{routing::get, Router};

use crate::handlers::games;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(games::get_games))
        .route("/:id", get(games::get_game_by_id))
}
