// handlers/session.rs - POST /api/session

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use crate::auth::{validate_jwt, Identity};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::{session_cookie, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub token: String,
}

/// POST /api/session - store a backend-issued token in the session cookie
///
/// The token is verified before the cookie is written, so a bad token never
/// reaches the browser. Responds with the identity it carries.
pub async fn session_post(
    State(config): State<Arc<AppConfig>>,
    Json(payload): Json<SessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = payload.token.trim();
    if token.is_empty() {
        return Err(ApiError::bad_request("token is required"));
    }

    let claims = validate_jwt(token, &config.session.jwt_secret).map_err(|e| {
        tracing::debug!("Rejected session token: {}", e);
        ApiError::from(e)
    })?;
    let identity = Identity::from(claims);

    tracing::info!("Session opened for user {} ({})", identity.id, identity.role);

    Ok((
        [(header::SET_COOKIE, session_cookie(&config.session, token))],
        ApiResponse::success(identity),
    ))
}
