// services/submission_service.rs
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::phase::Phase;
use crate::models::prediction::{header_row, row_match_id, row_participant, Prediction, Score};
use crate::services::deadline_service::PhaseDeadlines;
use crate::services::match_catalog::MatchCatalog;
use crate::services::prediction_store::PredictionStore;
use crate::services::tabular_store::Row;

/// Replaces a participant's predictions in the shared PALPITES table.
#[derive(Clone)]
pub struct SubmissionService {
    catalog: MatchCatalog,
    predictions: PredictionStore,
    deadlines: Arc<PhaseDeadlines>,
    // Serializes the read-modify-write of the whole table within this process.
    write_lock: Arc<Mutex<()>>,
}

impl SubmissionService {
    pub fn new(
        catalog: MatchCatalog,
        predictions: PredictionStore,
        deadlines: Arc<PhaseDeadlines>,
    ) -> Self {
        Self {
            catalog,
            predictions,
            deadlines,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Store `entries` as `participant`'s predictions. Returns how many were saved.
    pub async fn submit(
        &self,
        participant: &str,
        entries: &BTreeMap<u32, Score>,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        if entries.is_empty() {
            return Err(AppError::EmptySubmission);
        }

        let games = self.catalog.games().await?;
        let phases: HashMap<u32, Phase> = games.iter().map(|g| (g.match_id, g.phase)).collect();

        for (match_id, score) in entries {
            score.validate()?;
            let phase = phases
                .get(match_id)
                .ok_or_else(|| AppError::invalid_data(format!("Unknown match {}", match_id)))?;
            if !self.deadlines.is_open(*phase, now) {
                tracing::warn!(
                    "Rejected late prediction from {} for match {} ({})",
                    participant,
                    match_id,
                    phase
                );
                return Err(AppError::PhaseClosed(phase.label().to_string()));
            }
        }

        let _guard = self.write_lock.lock().await;

        let existing = self.predictions.fetch_rows().await?;
        let is_closed = |match_id: u32| {
            phases
                .get(&match_id)
                .is_some_and(|phase| !self.deadlines.is_open(*phase, now))
        };
        let rows = merge_rows(existing, participant, entries, is_closed);

        self.predictions.replace_all(rows).await?;
        self.catalog.invalidate();

        tracing::info!("Saved {} predictions for {}", entries.len(), participant);
        Ok(entries.len())
    }
}

/// New table contents: the header, then every other participant's rows
/// untouched, then `participant`'s rows for closed matches untouched, then
/// one fresh row per entry in match id order.
pub fn merge_rows(
    existing: Vec<Row>,
    participant: &str,
    entries: &BTreeMap<u32, Score>,
    is_closed: impl Fn(u32) -> bool,
) -> Vec<Row> {
    let mut existing = existing.into_iter();
    let header = existing.next().unwrap_or_else(header_row);

    let mut rows = vec![header];
    let mut kept_own = Vec::new();
    for row in existing {
        if row_participant(&row) != Some(participant) {
            rows.push(row);
        } else if row_match_id(&row).is_some_and(|id| is_closed(id) && !entries.contains_key(&id)) {
            kept_own.push(row);
        }
    }

    rows.extend(kept_own);
    rows.extend(
        entries
            .iter()
            .map(|(match_id, score)| Prediction::submitted(participant, *match_id, *score).to_row()),
    );
    rows
}
