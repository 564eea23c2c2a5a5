use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pre-registered participant. Codes are compared as plain text.
#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    pub name: String,
    pub code: String,
}

/// Phase cutoff as it appears in the pool config file.
#[derive(Debug, Clone, Deserialize)]
pub struct PhaseDeadline {
    pub phase: crate::models::phase::Phase,
    pub closes_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}
