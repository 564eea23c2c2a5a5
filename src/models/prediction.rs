use serde::{Deserialize, Serialize};
use validator::Validate;

pub const PREDICTIONS_TABLE: &str = "PALPITES";

pub const PREDICTIONS_HEADER: [&str; 8] = [
    "Participante",
    "id_jogo",
    "PalpiteA",
    "PalpiteB",
    "GolsA",
    "GolsB",
    "Validade",
    "Pontos",
];

// Fixed column positions in PALPITES
pub const COL_PARTICIPANT: usize = 0;
pub const COL_MATCH_ID: usize = 1;
pub const COL_PREDICTED_A: usize = 2;
pub const COL_PREDICTED_B: usize = 3;
pub const COL_ACTUAL_A: usize = 4;
pub const COL_ACTUAL_B: usize = 5;
pub const COL_VALIDITY: usize = 6;
pub const COL_POINTS: usize = 7;

/// A predicted score for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct Score {
    #[validate(range(max = 20, message = "Goals must be between 0 and 20"))]
    pub goals_a: u32,
    #[validate(range(max = 20, message = "Goals must be between 0 and 20"))]
    pub goals_b: u32,
}

impl Score {
    pub fn new(goals_a: u32, goals_b: u32) -> Self {
        Self { goals_a, goals_b }
    }
}

/// One row of the PALPITES sheet. The actual-goals, validity and points
/// columns belong to the scoring process and are only ever read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub participant: String,
    pub match_id: u32,
    pub predicted: Score,
    pub actual_a: Option<u32>,
    pub actual_b: Option<u32>,
    pub validity: Option<String>,
    pub points: Option<f64>,
}

impl Prediction {
    /// Fresh submission row: scoring columns left empty.
    pub fn submitted(participant: &str, match_id: u32, predicted: Score) -> Self {
        Self {
            participant: participant.to_string(),
            match_id,
            predicted,
            actual_a: None,
            actual_b: None,
            validity: None,
            points: None,
        }
    }

    pub fn from_row(row: &[String]) -> Result<Self, String> {
        let cell = |idx: usize| row.get(idx).map(|c| c.trim()).unwrap_or("");

        let participant = cell(COL_PARTICIPANT);
        if participant.is_empty() {
            return Err("empty participant".to_string());
        }
        let match_id = parse_required::<u32>(cell(COL_MATCH_ID), "id_jogo")?;
        let goals_a = parse_required::<u32>(cell(COL_PREDICTED_A), "PalpiteA")?;
        let goals_b = parse_required::<u32>(cell(COL_PREDICTED_B), "PalpiteB")?;

        Ok(Self {
            participant: participant.to_string(),
            match_id,
            predicted: Score::new(goals_a, goals_b),
            actual_a: parse_optional(cell(COL_ACTUAL_A), "GolsA")?,
            actual_b: parse_optional(cell(COL_ACTUAL_B), "GolsB")?,
            validity: Some(cell(COL_VALIDITY))
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            points: parse_optional(cell(COL_POINTS).replace(',', ".").as_str(), "Pontos")?,
        })
    }

    pub fn to_row(&self) -> Vec<String> {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        vec![
            self.participant.clone(),
            self.match_id.to_string(),
            self.predicted.goals_a.to_string(),
            self.predicted.goals_b.to_string(),
            opt(&self.actual_a),
            opt(&self.actual_b),
            opt(&self.validity),
            opt(&self.points),
        ]
    }
}

pub fn header_row() -> Vec<String> {
    PREDICTIONS_HEADER.iter().map(|h| h.to_string()).collect()
}

/// Participant owning a raw row, without parsing anything else. Trimmed the
/// same way `Prediction::from_row` trims it.
pub fn row_participant(row: &[String]) -> Option<&str> {
    row.get(COL_PARTICIPANT).map(|c| c.trim())
}

/// Match id of a raw row, if it parses.
pub fn row_match_id(row: &[String]) -> Option<u32> {
    row.get(COL_MATCH_ID).and_then(|c| c.trim().parse().ok())
}

/// Typed view of the PALPITES sheet. Malformed rows are skipped.
pub fn parse_predictions(rows: &[Vec<String>]) -> Vec<Prediction> {
    rows.iter()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| !row.iter().all(|c| c.trim().is_empty()))
        .filter_map(|(idx, row)| match Prediction::from_row(row) {
            Ok(prediction) => Some(prediction),
            Err(reason) => {
                tracing::warn!("Skipping {} row {}: {}", PREDICTIONS_TABLE, idx + 1, reason);
                None
            }
        })
        .collect()
}

fn parse_required<T: std::str::FromStr>(value: &str, column: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("invalid {} '{}'", column, value))
}

fn parse_optional<T: std::str::FromStr>(value: &str, column: &str) -> Result<Option<T>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_required(value, column).map(Some)
}
