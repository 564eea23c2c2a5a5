use std::sync::Arc;
use std::time::Duration;

use crate::config::PoolConfig;
use crate::services::deadline_service::PhaseDeadlines;
use crate::services::match_catalog::MatchCatalog;
use crate::services::participant_directory::ParticipantDirectory;
use crate::services::prediction_store::PredictionStore;
use crate::services::session_service::SessionService;
use crate::services::submission_service::SubmissionService;
use crate::services::tabular_store::TabularStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TabularStore>,
    pub directory: Arc<ParticipantDirectory>,
    pub deadlines: Arc<PhaseDeadlines>,
    pub catalog: MatchCatalog,
    pub predictions: PredictionStore,
    pub submissions: SubmissionService,
    pub sessions: SessionService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TabularStore>,
        pool: &PoolConfig,
        sessions: SessionService,
        matches_ttl: Duration,
        predictions_ttl: Duration,
    ) -> Self {
        let directory = Arc::new(ParticipantDirectory::new(pool.participant_codes()));
        let deadlines = Arc::new(PhaseDeadlines::new(pool.deadline_map()));
        let catalog = MatchCatalog::new(store.clone(), matches_ttl);
        let predictions = PredictionStore::new(store.clone(), predictions_ttl);
        let submissions =
            SubmissionService::new(catalog.clone(), predictions.clone(), deadlines.clone());

        AppState {
            store,
            directory,
            deadlines,
            catalog,
            predictions,
            submissions,
            sessions,
        }
    }
}
