use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::{AppError, Result};
use crate::models::participant::Claims;

/// Issues and checks signed session tokens for logged-in participants.
#[derive(Clone)]
pub struct SessionService {
    jwt_secret: String,
    lifetime: Duration,
}

pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// One year
const MAX_LIFETIME_HOURS: i64 = 24 * 366;

impl SessionService {
    pub fn new(jwt_secret: String, lifetime_hours: i64) -> Result<Self> {
        let lifetime = Some(lifetime_hours)
            .filter(|h| (1..=MAX_LIFETIME_HOURS).contains(h))
            .and_then(Duration::try_hours)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "SESSION_HOURS must be between 1 and {}, got {}",
                    MAX_LIFETIME_HOURS, lifetime_hours
                ))
            })?;

        Ok(Self { jwt_secret, lifetime })
    }

    pub fn issue(&self, participant: &str, now: DateTime<Utc>) -> Result<IssuedSession> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::internal_server_error("Failed to calculate expiration"))?;

        let claims = Claims {
            sub: participant.to_string(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::internal_server_error(format!("Token generation failed: {}", e)))?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Claims of a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }
}
