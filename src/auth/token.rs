use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::AppError;

// Development fallbacks; override with JWT_SECRET / JWT_EXPIRES_IN_HOURS.
const DEFAULT_SECRET: &str = "your-secret-key";
const DEFAULT_EXPIRY_HOURS: i64 = 168; // 7 days

/// Claims carried in the bearer token. Identity and role are trusted from
/// the signature alone; no database lookup happens on verification, so a
/// stale token keeps its old email/role until it is re-issued.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub id: i64,
    /// Email at issue time.
    pub email: String,
    /// Role at issue time (0=member, 1=manager, 2=admin).
    pub role: i16,
    /// Expiration, seconds since epoch.
    pub exp: usize,
    /// Issued at, seconds since epoch.
    pub iat: usize,
}

fn secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string())
}

fn expiry_hours() -> i64 {
    env::var("JWT_EXPIRES_IN_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_EXPIRY_HOURS)
}

/// Issues a signed token embedding the user's id, email, and role.
pub fn generate_token(user_id: i64, email: &str, role: i16) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::hours(expiry_hours()))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        id: user_id,
        email: email.to_string(),
        role,
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret().as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a token's signature and expiry and returns its claims.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}
