// handlers/me.rs - GET/DELETE /api/me

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
};

use crate::auth::Identity;
use crate::config::AppConfig;
use crate::middleware::{cleared_session_cookie, ApiResponse, CurrentUser};

/// GET /api/me - identity of the caller, taken from the session cookie
///
/// Returns the bare identity (no envelope) so the dashboard can store it as is:
/// ```json
/// { "id": 1, "name": "Ana", "email": "ana@uaifood.com", "role": "ADMIN" }
/// ```
/// Missing, invalid and expired cookies all answer 401.
pub async fn me_get(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}

/// DELETE /api/me - logout by clearing the session cookie
///
/// Always succeeds; there is no server-side session to revoke.
pub async fn me_delete(State(config): State<Arc<AppConfig>>) -> impl IntoResponse {
    tracing::info!("Clearing session cookie");
    (
        [(header::SET_COOKIE, cleared_session_cookie(&config.session))],
        ApiResponse::<()>::no_content(),
    )
}
