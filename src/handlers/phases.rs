use axum::{extract::State, response::Json};
use chrono::Utc;

use crate::services::deadline_service::PhaseStatus;
use crate::state::AppState;

/// Deadline board shown next to the login form.
pub async fn get_phases(State(state): State<AppState>) -> Json<Vec<PhaseStatus>> {
    Json(state.deadlines.board(Utc::now()))
}
