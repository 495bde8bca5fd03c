//! JWT issuing and verification (HS256).
//!
//! The token carries the role as its stored `(kind, school_id)` parts; decode
//! rebuilds the tagged `Role`, so a token minted for a misconfigured actor
//! fails loudly rather than producing an unbound role.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skolar_core::models::{Role, User};
use skolar_core::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    pub role_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<Uuid>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

pub fn issue_token(user: &User, secret: &str, expiry_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let (role_kind, school_id) = user.role.to_parts();
    let claims = JwtClaims {
        sub: user.id,
        username: user.username.clone(),
        role_kind: role_kind.to_string(),
        school_id,
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

pub fn verify_token(token: &str, secret: &str) -> Result<JwtClaims, AppError> {
    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

impl JwtClaims {
    pub fn role(&self) -> Result<Role, AppError> {
        Role::from_parts(&self.role_kind, self.school_id, &self.username)
    }
}
