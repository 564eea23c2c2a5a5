use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};
use crate::models::phase::Phase;

pub const MATCHES_TABLE: &str = "JOGOS";

// Match rows as they sit in the JOGOS sheet. Read-only from our side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub match_id: u32,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub team_a: String,
    pub team_b: String,
}

/// Column positions of the match sheet, resolved from its header row.
#[derive(Debug, Clone, Copy)]
pub struct GameColumns {
    id: usize,
    phase: usize,
    group: Option<usize>,
    team_a: usize,
    team_b: usize,
}

impl GameColumns {
    pub fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                AppError::malformed(MATCHES_TABLE, format!("missing column '{}'", name))
            })
        };

        Ok(GameColumns {
            id: require("ID_Jogo")?,
            phase: require("Fase")?,
            group: find("Grupo"),
            team_a: require("SeleçãoA")?,
            team_b: require("SeleçãoB")?,
        })
    }

    pub fn parse(&self, row: &[String]) -> std::result::Result<Game, String> {
        let cell = |idx: usize| row.get(idx).map(|c| c.trim()).unwrap_or("");

        let match_id = cell(self.id)
            .parse::<u32>()
            .map_err(|_| format!("invalid match id '{}'", cell(self.id)))?;
        let phase = cell(self.phase).parse::<Phase>()?;
        let group = self
            .group
            .map(cell)
            .filter(|g| !g.is_empty())
            .map(str::to_string);

        Ok(Game {
            match_id,
            phase,
            group,
            team_a: cell(self.team_a).to_string(),
            team_b: cell(self.team_b).to_string(),
        })
    }
}

/// Parse the whole match sheet. Rows that do not parse are skipped.
pub fn parse_games(rows: &[Vec<String>]) -> Result<Vec<Game>> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let columns = GameColumns::from_header(header)?;

    let mut games = Vec::with_capacity(body.len());
    for (idx, row) in body.iter().enumerate() {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        match columns.parse(row) {
            Ok(game) => games.push(game),
            Err(reason) => {
                tracing::warn!("Skipping {} row {}: {}", MATCHES_TABLE, idx + 2, reason);
            }
        }
    }
    Ok(games)
}

#[derive(Debug, Serialize)]
pub struct PhaseGames {
    pub phase: Phase,
    pub games: Vec<Game>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_parse_games_by_header_name() {
        let rows = vec![
            row(&["Fase", "ID_Jogo", "Grupo", "SeleçãoA", "SeleçãoB", "Data"]),
            row(&["Grupo", "1", "A", "México", "África do Sul", "11/06"]),
            row(&["Final", "104", "", "TBD", "TBD", "19/07"]),
        ];

        let games = parse_games(&rows).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].match_id, 1);
        assert_eq!(games[0].group.as_deref(), Some("A"));
        assert_eq!(games[0].team_b, "África do Sul");
        assert_eq!(games[1].phase, Phase::Final);
        assert_eq!(games[1].group, None);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let rows = vec![
            row(&["ID_Jogo", "Fase", "Grupo", "SeleçãoA", "SeleçãoB"]),
            row(&["x", "Grupo", "A", "Brasil", "Marrocos"]),
            row(&["2", "Quintas", "", "Brasil", "Marrocos"]),
            row(&["", "", "", "", ""]),
            row(&["3", "Grupo", "C", "Brasil", "Marrocos"]),
        ];

        let games = parse_games(&rows).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].match_id, 3);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let rows = vec![row(&["ID_Jogo", "Fase"])];
        assert!(matches!(parse_games(&rows), Err(AppError::MalformedRow { .. })));
    }

    #[test]
    fn test_empty_sheet() {
        assert!(parse_games(&[]).unwrap().is_empty());
    }
}
