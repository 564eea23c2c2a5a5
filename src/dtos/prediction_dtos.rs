use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::prediction::Score;
use crate::services::deadline_service::PhaseStatus;

/// Edited scores keyed by match id, e.g. `{"predictions": {"7": {"goals_a": 2, "goals_b": 1}}}`.
#[derive(Debug, Deserialize)]
pub struct SubmitPredictionsRequest {
    #[serde(default)]
    pub predictions: BTreeMap<u32, Score>,
}

#[derive(Debug, Serialize)]
pub struct SubmitPredictionsResponse {
    pub success: bool,
    pub saved: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MatchCard {
    pub match_id: u32,
    pub team_a: String,
    pub team_b: String,
    pub goals_a: u32,
    pub goals_b: u32,
    pub saved: bool,
    pub read_only: bool,
}

#[derive(Debug, Serialize)]
pub struct GroupSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub cards: Vec<MatchCard>,
}

#[derive(Debug, Serialize)]
pub struct PhaseSection {
    #[serde(flatten)]
    pub status: PhaseStatus,
    pub sections: Vec<GroupSection>,
}

/// Everything a client needs to render one participant's prediction form.
#[derive(Debug, Serialize)]
pub struct PredictionBoard {
    pub participant: String,
    pub has_saved_predictions: bool,
    pub any_phase_open: bool,
    pub phases: Vec<PhaseSection>,
}
