// services/memory_store.rs
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::errors::{AppError, Result};
use crate::models::game::{Game, MATCHES_TABLE};
use crate::services::tabular_store::{Row, TabularStore};

/// In-process store with the same table semantics as the spreadsheet.
/// Backs local runs (`STORE_BACKEND=memory`) and the test suite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, rows: Vec<Row>) -> Self {
        self.tables.get_mut().insert(table.to_string(), rows);
        self
    }

    /// Seed the match table from a JSON array of games.
    pub fn seeded_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let games: Vec<Game> = serde_json::from_str(&raw)
            .map_err(|e| AppError::configuration(format!("Invalid seed {}: {}", path.display(), e)))?;

        tracing::info!("Seeded memory store with {} matches", games.len());
        Ok(Self::new().with_table(MATCHES_TABLE, games_to_rows(&games)))
    }

    /// Number of mutating calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn games_to_rows(games: &[Game]) -> Vec<Row> {
    let mut rows = vec![["ID_Jogo", "Fase", "Grupo", "SeleçãoA", "SeleçãoB"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Row>()];
    rows.extend(games.iter().map(|game| {
        vec![
            game.match_id.to_string(),
            game.phase.label().to_string(),
            game.group.clone().unwrap_or_default(),
            game.team_a.clone(),
            game.team_b.clone(),
        ]
    }));
    rows
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn fetch_all_rows(&self, table: &str) -> Result<Vec<Row>> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .ok_or_else(|| AppError::ResourceNotFound(table.to_string()))
    }

    async fn append_row(&self, table: &str, row: Row) -> Result<()> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| AppError::ResourceNotFound(table.to_string()))?;
        rows.push(row);
        self.record_write();
        Ok(())
    }

    async fn clear_all_rows(&self, table: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| AppError::ResourceNotFound(table.to_string()))?;
        rows.clear();
        self.record_write();
        Ok(())
    }

    async fn replace_all_rows(&self, table: &str, rows: Vec<Row>) -> Result<()> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .get_mut(table)
            .ok_or_else(|| AppError::ResourceNotFound(table.to_string()))?;
        *existing = rows;
        self.record_write();
        Ok(())
    }

    async fn ensure_table(&self, table: &str, header: &[&str]) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(table) {
            return Ok(false);
        }
        tables.insert(
            table.to_string(),
            vec![header.iter().map(|h| h.to_string()).collect()],
        );
        self.record_write();
        Ok(true)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::phase::Phase;

    #[tokio::test]
    async fn test_missing_table_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.fetch_all_rows("JOGOS").await,
            Err(AppError::ResourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_table_creates_once() {
        let store = MemoryStore::new();
        assert!(store.ensure_table("PALPITES", &["a", "b"]).await.unwrap());
        assert!(!store.ensure_table("PALPITES", &["a", "b"]).await.unwrap());

        store.append_row("PALPITES", vec!["1".into(), "2".into()]).await.unwrap();
        let rows = store.fetch_all_rows("PALPITES").await.unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_replace_and_clear() {
        let store = MemoryStore::new().with_table("T", vec![vec!["h".into()]]);
        store
            .replace_all_rows("T", vec![vec!["h".into()], vec!["x".into()]])
            .await
            .unwrap();
        assert_eq!(store.fetch_all_rows("T").await.unwrap().len(), 2);

        store.clear_all_rows("T").await.unwrap();
        assert!(store.fetch_all_rows("T").await.unwrap().is_empty());
    }

    #[test]
    fn test_games_to_rows_has_header() {
        let rows = games_to_rows(&[Game {
            match_id: 1,
            phase: Phase::GroupStage,
            group: Some("A".into()),
            team_a: "México".into(),
            team_b: "Coreia do Sul".into(),
        }]);
        assert_eq!(rows[0][0], "ID_Jogo");
        assert_eq!(rows[1], vec!["1", "Grupo", "A", "México", "Coreia do Sul"]);
    }
}
