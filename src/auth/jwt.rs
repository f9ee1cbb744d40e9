use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::Role;

/// Token payload. It only references the server-side session; the session row
/// is the source of truth.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub sid: Uuid,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

pub fn sign_token(
    user_id: i64,
    session_id: Uuid,
    role: Role,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    secret: &str,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id,
        sid: session_id,
        role,
        iat: issued_at.timestamp().max(0) as usize,
        exp: expires_at.timestamp().max(0) as usize,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::internal(format!("Token signing failed: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|d| d.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "rejected session token");
        AppError::unauthenticated("Sesión no válida o expirada")
    })
}
