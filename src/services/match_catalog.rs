use std::sync::Arc;
use std::time::Duration;

use crate::errors::{AppError, Result};
use crate::models::game::{parse_games, Game, MATCHES_TABLE};
use crate::services::cache::TtlCache;
use crate::services::tabular_store::TabularStore;

/// Read-only access to the match list kept in the store.
#[derive(Clone)]
pub struct MatchCatalog {
    store: Arc<dyn TabularStore>,
    cache: TtlCache<Arc<Vec<Game>>>,
}

impl MatchCatalog {
    pub fn new(store: Arc<dyn TabularStore>, ttl: Duration) -> Self {
        Self {
            store,
            cache: TtlCache::new("matches", ttl),
        }
    }

    pub async fn games(&self) -> Result<Arc<Vec<Game>>> {
        if let Some(games) = self.cache.get() {
            return Ok(games);
        }

        let generation = self.cache.generation();
        let rows = self.store.fetch_all_rows(MATCHES_TABLE).await?;
        let games = Arc::new(parse_games(&rows)?);
        tracing::info!("Loaded {} matches from {}", games.len(), MATCHES_TABLE);

        self.cache.put(generation, games.clone());
        Ok(games)
    }

    pub async fn game(&self, match_id: u32) -> Result<Game> {
        self.games()
            .await?
            .iter()
            .find(|g| g.match_id == match_id)
            .cloned()
            .ok_or(AppError::MatchNotFound(match_id))
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::phase::Phase;
    use crate::services::memory_store::{games_to_rows, MemoryStore};

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new().with_table(
            MATCHES_TABLE,
            games_to_rows(&[Game {
                match_id: 7,
                phase: Phase::GroupStage,
                group: Some("B".into()),
                team_a: "Brasil".into(),
                team_b: "Marrocos".into(),
            }]),
        ))
    }

    #[tokio::test]
    async fn test_game_lookup() {
        let catalog = MatchCatalog::new(store(), Duration::from_secs(300));
        assert_eq!(catalog.game(7).await.unwrap().team_a, "Brasil");
        assert!(matches!(catalog.game(8).await, Err(AppError::MatchNotFound(8))));
    }

    #[tokio::test]
    async fn test_served_from_cache_until_invalidated() {
        let store = store();
        let catalog = MatchCatalog::new(store.clone(), Duration::from_secs(300));
        assert_eq!(catalog.games().await.unwrap().len(), 1);

        store
            .replace_all_rows(MATCHES_TABLE, games_to_rows(&[]))
            .await
            .unwrap();
        assert_eq!(catalog.games().await.unwrap().len(), 1);

        catalog.invalidate();
        assert!(catalog.games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_sheet_surfaces() {
        let catalog = MatchCatalog::new(Arc::new(MemoryStore::new()), Duration::from_secs(300));
        assert!(matches!(catalog.games().await, Err(AppError::ResourceNotFound(_))));
    }
}
