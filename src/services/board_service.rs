use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

use crate::dtos::prediction_dtos::{GroupSection, MatchCard, PhaseSection, PredictionBoard};
use crate::models::game::Game;
use crate::models::phase::Phase;
use crate::models::prediction::{Prediction, Score};
use crate::services::deadline_service::PhaseDeadlines;

/// Per-phase form for one participant. Phases without matches are left out;
/// cards of closed phases are read-only.
pub fn build_board(
    participant: &str,
    games: &[Game],
    saved: &[Prediction],
    deadlines: &PhaseDeadlines,
    now: DateTime<Utc>,
) -> PredictionBoard {
    let saved_scores: HashMap<u32, Score> = saved
        .iter()
        .filter(|p| p.participant == participant)
        .map(|p| (p.match_id, p.predicted))
        .collect();

    let mut phases = Vec::new();
    for phase in Phase::ALL {
        let phase_games: Vec<&Game> = games.iter().filter(|g| g.phase == phase).collect();
        if phase_games.is_empty() {
            continue;
        }

        let status = deadlines.status(phase, now);
        let read_only = !status.open;
        let card = |game: &Game| {
            let score = saved_scores.get(&game.match_id);
            MatchCard {
                match_id: game.match_id,
                team_a: game.team_a.clone(),
                team_b: game.team_b.clone(),
                goals_a: score.map(|s| s.goals_a).unwrap_or(0),
                goals_b: score.map(|s| s.goals_b).unwrap_or(0),
                saved: score.is_some(),
                read_only,
            }
        };

        let sections = if phase == Phase::GroupStage {
            let groups: BTreeSet<&str> = phase_games
                .iter()
                .filter_map(|g| g.group.as_deref())
                .collect();
            groups
                .into_iter()
                .map(|group| GroupSection {
                    group: Some(group.to_string()),
                    cards: phase_games
                        .iter()
                        .filter(|g| g.group.as_deref() == Some(group))
                        .map(|g| card(*g))
                        .collect(),
                })
                .collect()
        } else {
            let mut ordered = phase_games.clone();
            ordered.sort_by_key(|g| g.match_id);
            vec![GroupSection {
                group: None,
                cards: ordered.into_iter().map(card).collect(),
            }]
        };

        phases.push(PhaseSection { status, sections });
    }

    PredictionBoard {
        participant: participant.to_string(),
        has_saved_predictions: !saved_scores.is_empty(),
        any_phase_open: phases.iter().any(|p| p.status.open),
        phases,
    }
}
