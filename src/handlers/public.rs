// handlers/public.rs - unauthenticated service routes

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::ApiError;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "UaiFood Admin",
            "version": version,
            "description": "Session service for the UaiFood admin dashboard",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "me": "GET /api/me, DELETE /api/me (session cookie)",
                "session": "POST /api/session (token to cookie)",
            }
        }
    }))
}

/// The only dependency is the signing secret; without it nobody can log in.
pub async fn health(State(config): State<Arc<AppConfig>>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    if config.session.jwt_secret.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "session secret not configured",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                }
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "status": "ok",
                "timestamp": now,
            }
        })),
    )
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
