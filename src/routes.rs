use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers;
use crate::middleware::session_middleware;

/// Build the session service router around an explicit configuration
pub fn app(config: Arc<AppConfig>) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Session cookie routes
        .merge(session_routes(config.clone()))
        .fallback(handlers::not_found)
        // Global middleware
        .layer(cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(config)
}

fn session_routes(config: Arc<AppConfig>) -> Router<Arc<AppConfig>> {
    Router::new()
        .route("/api/me", get(handlers::me_get).delete(handlers::me_delete))
        .route("/api/session", post(handlers::session_post))
        .route_layer(middleware::from_fn_with_state(config, session_middleware))
}

// The dashboard sends the cookie cross-origin, so origins are listed explicitly.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use crate::auth::{generate_jwt, Claims};
    use crate::models::Role;

    const SECRET: &str = "router-secret";

    fn router() -> Router {
        app(Arc::new(AppConfig::for_tests(SECRET)))
    }

    #[tokio::test]
    async fn me_without_cookie_is_unauthorized() {
        let res = router()
            .oneshot(Request::get("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_with_valid_cookie_is_ok() {
        let claims = Claims::new(9, "Rita".into(), "rita@x.com".into(), Role::Client, 1).unwrap();
        let token = generate_jwt(&claims, SECRET).unwrap();
        let res = router()
            .oneshot(
                Request::get("/api/me")
                    .header(header::COOKIE, format!("uaifoodtoken={}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let res = router()
            .oneshot(Request::get("/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
