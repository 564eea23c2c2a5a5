use axum::{extract::State, response::Json};
use chrono::Utc;
use validator::Validate;

use crate::dtos::auth_dtos::{AuthResponse, LoginRequest};
use crate::errors::{AppError, Result};
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload.validate()?;

    if !state.directory.validate(&payload.name, &payload.code) {
        tracing::warn!("Failed login attempt for '{}'", payload.name);
        return Err(AppError::InvalidCredentials);
    }

    let session = state.sessions.issue(&payload.name, Utc::now())?;
    tracing::info!("{} logged in", payload.name);

    Ok(Json(AuthResponse {
        participant: payload.name,
        token: session.token,
        expires_at: session.expires_at,
    }))
}
