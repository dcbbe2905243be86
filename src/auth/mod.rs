//! Session token handling.
//!
//! Tokens are HS256 JWTs issued by the UaiFood backend and carried in the
//! session cookie. Resolution is stateless: a token either verifies and
//! yields an [`Identity`], or the caller is anonymous.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::models::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(deserialize_with = "deserialize_subject")]
    pub sub: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Claims that expire `expiry_hours` from now
    pub fn new(sub: i64, name: String, email: String, role: Role, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| JwtError::TokenGeneration(format!("expiry of {} hours is out of range", expiry_hours)))?;

        Ok(Self {
            sub,
            name,
            email,
            role,
            exp: Some(exp.timestamp()),
            iat: Some(now.timestamp()),
        })
    }
}

/// Minimal identity returned by `GET /api/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

/// The backend may emit `sub` either as a number or as a numeric string
fn deserialize_subject<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Subject {
        Number(i64),
        Text(String),
    }

    match Subject::deserialize(deserializer)? {
        Subject::Number(n) => Ok(n),
        Subject::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric subject '{}'", s))),
    }
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify signature and, when present, expiry
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    // Tokens without `exp` are accepted; an `exp` in the past is still rejected.
    validation.required_spec_claims = HashSet::new();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Resolve a possibly-absent token to an identity.
///
/// Missing, malformed, tampered and expired tokens all collapse to `None`.
pub fn resolve_identity(token: Option<&str>, secret: &str) -> Option<Identity> {
    let token = token.map(str::trim).filter(|t| !t.is_empty())?;

    match validate_jwt(token, secret) {
        Ok(claims) => Some(Identity::from(claims)),
        Err(e) => {
            tracing::debug!("Session token rejected: {}", e);
            None
        }
    }
}
