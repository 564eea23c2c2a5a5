use std::sync::Arc;
use std::time::Duration;

use crate::errors::{AppError, Result};
use crate::models::prediction::{
    header_row, parse_predictions, Prediction, PREDICTIONS_HEADER, PREDICTIONS_TABLE,
};
use crate::services::cache::TtlCache;
use crate::services::tabular_store::{Row, TabularStore};

/// Read/replace access to the PALPITES sheet.
#[derive(Clone)]
pub struct PredictionStore {
    store: Arc<dyn TabularStore>,
    cache: TtlCache<Arc<Vec<Row>>>,
}

impl PredictionStore {
    pub fn new(store: Arc<dyn TabularStore>, ttl: Duration) -> Self {
        Self {
            store,
            cache: TtlCache::new("predictions", ttl),
        }
    }

    /// Full table, header included, bypassing the cache. Creates the sheet
    /// with its header when it does not exist yet.
    pub async fn fetch_rows(&self) -> Result<Vec<Row>> {
        match self.store.fetch_all_rows(PREDICTIONS_TABLE).await {
            Ok(rows) => Ok(rows),
            Err(AppError::ResourceNotFound(_)) => {
                self.store
                    .ensure_table(PREDICTIONS_TABLE, &PREDICTIONS_HEADER)
                    .await?;
                Ok(vec![header_row()])
            }
            Err(e) => Err(e),
        }
    }

    pub async fn rows(&self) -> Result<Arc<Vec<Row>>> {
        if let Some(rows) = self.cache.get() {
            return Ok(rows);
        }

        let generation = self.cache.generation();
        let rows = Arc::new(self.fetch_rows().await?);
        self.cache.put(generation, rows.clone());
        Ok(rows)
    }

    pub async fn all(&self) -> Result<Vec<Prediction>> {
        Ok(parse_predictions(&self.rows().await?))
    }

    pub async fn for_participant(&self, participant: &str) -> Result<Vec<Prediction>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|p| p.participant == participant)
            .collect())
    }

    /// Overwrite the whole table and drop the cached copy.
    pub async fn replace_all(&self, rows: Vec<Row>) -> Result<()> {
        self.store.replace_all_rows(PREDICTIONS_TABLE, rows).await?;
        self.invalidate();
        Ok(())
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}
