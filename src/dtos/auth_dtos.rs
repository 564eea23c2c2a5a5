use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Fill in your name"))]
    pub name: String,

    #[validate(length(min = 1, message = "Fill in your code"))]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub participant: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
