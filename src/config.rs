// config.rs
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{AppError, Result};
use crate::models::participant::{Participant, PhaseDeadline};
use crate::models::phase::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sheets,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sheets" => Ok(StoreBackend::Sheets),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::configuration(format!(
                "{} is not a supported store backend. Use either `sheets` or `memory`.",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_hours: i64,
    pub store_backend: StoreBackend,
    pub spreadsheet_id: Option<String>,
    pub service_account_path: PathBuf,
    pub memory_seed: Option<PathBuf>,
    pub matches_cache_ttl: Duration,
    pub predictions_cache_ttl: Duration,
    pub store_timeout: Duration,
    pub pool: PoolConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let store_backend: StoreBackend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "sheets".to_string())
            .parse()?;

        let spreadsheet_id = env::var("SPREADSHEET_ID").ok().filter(|s| !s.is_empty());
        if store_backend == StoreBackend::Sheets && spreadsheet_id.is_none() {
            return Err(AppError::configuration("SPREADSHEET_ID must be set"));
        }

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::configuration("JWT_SECRET must be set"))?;

        let pool_path = env::var("POOL_CONFIG").unwrap_or_else(|_| "pool.json".to_string());
        let pool = PoolConfig::from_file(Path::new(&pool_path))?;

        Ok(AppConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("PORT", 10000)?,
            jwt_secret,
            session_hours: parse_env("SESSION_HOURS", 12)?,
            store_backend,
            spreadsheet_id,
            service_account_path: env::var("GOOGLE_SERVICE_ACCOUNT")
                .unwrap_or_else(|_| "./google-service-account.json".to_string())
                .into(),
            memory_seed: env::var("MEMORY_SEED").ok().map(PathBuf::from),
            matches_cache_ttl: cache_ttl("MATCHES_CACHE_SECS", parse_env("MATCHES_CACHE_SECS", 300)?)?,
            predictions_cache_ttl: cache_ttl(
                "PREDICTIONS_CACHE_SECS",
                parse_env("PREDICTIONS_CACHE_SECS", 60)?,
            )?,
            store_timeout: Duration::from_secs(parse_env("STORE_TIMEOUT_SECS", 30)?),
            pool,
        })
    }
}

const MAX_CACHE_SECS: u64 = 7 * 24 * 3600;

fn cache_ttl(key: &str, secs: u64) -> Result<Duration> {
    if secs > MAX_CACHE_SECS {
        return Err(AppError::configuration(format!(
            "{} must be at most {} seconds",
            key, MAX_CACHE_SECS
        )));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}

/// Participants and phase deadlines. Loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub deadlines: Vec<PhaseDeadline>,
}

impl PoolConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let pool: PoolConfig = serde_json::from_str(raw)
            .map_err(|e| AppError::configuration(format!("Invalid pool config: {}", e)))?;
        pool.validate()?;
        Ok(pool)
    }

    fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for participant in &self.participants {
            if participant.name.trim().is_empty() || participant.code.is_empty() {
                return Err(AppError::configuration(
                    "Participant name and code must not be empty",
                ));
            }
            if !names.insert(participant.name.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate participant '{}'",
                    participant.name
                )));
            }
        }

        let mut phases = HashSet::new();
        for deadline in &self.deadlines {
            if !phases.insert(deadline.phase) {
                return Err(AppError::configuration(format!(
                    "Duplicate deadline for phase '{}'",
                    deadline.phase
                )));
            }
        }
        Ok(())
    }

    pub fn participant_codes(&self) -> HashMap<String, String> {
        self.participants
            .iter()
            .map(|p| (p.name.clone(), p.code.clone()))
            .collect()
    }

    pub fn deadline_map(&self) -> HashMap<Phase, DateTime<Utc>> {
        self.deadlines.iter().map(|d| (d.phase, d.closes_at)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: &str = r#"{
        "participants": [
            {"name": "Felipe", "code": "ABC123"},
            {"name": "João", "code": "XYZ789"}
        ],
        "deadlines": [
            {"phase": "Grupo", "closes_at": "2026-06-11T14:00:00-03:00"},
            {"phase": "Final", "closes_at": "2026-06-20T16:00:00Z"}
        ]
    }"#;

    #[test]
    fn test_pool_config_parses() {
        let pool = PoolConfig::from_json(POOL).unwrap();
        assert_eq!(pool.participants.len(), 2);

        let deadlines = pool.deadline_map();
        assert_eq!(
            deadlines[&Phase::GroupStage].to_rfc3339(),
            "2026-06-11T17:00:00+00:00"
        );
        assert_eq!(pool.participant_codes()["João"], "XYZ789");
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let raw = r#"{"participants": [
            {"name": "Felipe", "code": "A"},
            {"name": "Felipe", "code": "B"}
        ]}"#;
        assert!(matches!(
            PoolConfig::from_json(raw),
            Err(AppError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_duplicate_phase_rejected() {
        let raw = r#"{"participants": [], "deadlines": [
            {"phase": "Final", "closes_at": "2026-06-20T16:00:00Z"},
            {"phase": "Final", "closes_at": "2026-06-21T16:00:00Z"}
        ]}"#;
        assert!(PoolConfig::from_json(raw).is_err());
    }

    #[test]
    fn test_unknown_phase_rejected() {
        let raw = r#"{"participants": [], "deadlines": [
            {"phase": "Quintas", "closes_at": "2026-06-20T16:00:00Z"}
        ]}"#;
        assert!(PoolConfig::from_json(raw).is_err());
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_cache_ttl_bounds() {
        assert_eq!(cache_ttl("MATCHES_CACHE_SECS", 0).unwrap(), Duration::ZERO);
        assert_eq!(
            cache_ttl("MATCHES_CACHE_SECS", 300).unwrap(),
            Duration::from_secs(300)
        );
        assert!(matches!(
            cache_ttl("MATCHES_CACHE_SECS", u64::MAX),
            Err(AppError::ConfigurationError(_))
        ));
    }
}
