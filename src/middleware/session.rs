use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use cookie::{Cookie, CookieBuilder, SameSite};

use crate::auth::{resolve_identity, Identity};
use crate::config::{AppConfig, SessionConfig};
use crate::error::ApiError;

/// Identity resolved from the session cookie, or `None` for anonymous callers
#[derive(Clone, Debug)]
pub struct Session(pub Option<Identity>);

/// Resolves the session cookie once per request and stores the outcome in
/// the request extensions. Never rejects: handlers decide what anonymous means.
pub async fn session_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_session_token(request.headers(), &config.session.cookie_name);
    let identity = resolve_identity(token.as_deref(), &config.session.jwt_secret);

    if let Some(identity) = &identity {
        tracing::debug!("Session resolved for user {} ({})", identity.id, identity.role);
    }

    request.extensions_mut().insert(Session(identity));
    next.run(request).await
}

/// Extractor for handlers that require a logged-in caller
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>() {
            Some(Session(Some(identity))) => Ok(CurrentUser(identity.clone())),
            _ => Err(ApiError::not_logged_in()),
        }
    }
}

/// Extract the session token from the `Cookie` header(s)
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
}

fn base_cookie(config: &SessionConfig, value: String) -> CookieBuilder<'static> {
    Cookie::build((config.cookie_name.clone(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
}

/// `Set-Cookie` value that stores the session token
pub fn session_cookie(config: &SessionConfig, token: &str) -> String {
    base_cookie(config, token.to_string()).build().to_string()
}

/// `Set-Cookie` value that clears the session (empty value, `Max-Age=0`)
pub fn cleared_session_cookie(config: &SessionConfig) -> String {
    base_cookie(config, String::new())
        .max_age(cookie::time::Duration::ZERO)
        .build()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for v in values {
            map.append(header::COOKIE, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let map = headers(&["theme=dark; uaifoodtoken=abc.def.ghi; lang=pt"]);
        assert_eq!(extract_session_token(&map, "uaifoodtoken").as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn searches_every_cookie_header() {
        let map = headers(&["theme=dark", "uaifoodtoken=tok"]);
        assert_eq!(extract_session_token(&map, "uaifoodtoken").as_deref(), Some("tok"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert!(extract_session_token(&HeaderMap::new(), "uaifoodtoken").is_none());
        assert!(extract_session_token(&headers(&["uaifoodtoken="]), "uaifoodtoken").is_none());
        assert!(extract_session_token(&headers(&["xuaifoodtoken=abc"]), "uaifoodtoken").is_none());
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let config = AppConfig::for_tests("s").session;
        let cookie = cleared_session_cookie(&config);
        assert!(cookie.starts_with("uaifoodtoken=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn secure_flag_follows_config() {
        let mut config = AppConfig::for_tests("s").session;
        config.cookie_secure = true;
        assert!(session_cookie(&config, "t").contains("; Secure"));
    }

    #[test]
    fn quoted_values_and_stray_pairs_are_tolerated() {
        let map = headers(&["junk; uaifoodtoken=\"abc\"; lang=pt"]);
        assert_eq!(extract_session_token(&map, "uaifoodtoken").as_deref(), Some("abc"));
    }

    #[test]
    fn stored_cookie_round_trips_through_the_parser() {
        let config = AppConfig::for_tests("s").session;
        let set_cookie = session_cookie(&config, "abc.def.ghi");
        let parsed = Cookie::parse(set_cookie).unwrap();
        assert_eq!(parsed.name(), "uaifoodtoken");
        assert_eq!(parsed.value(), "abc.def.ghi");
        assert_eq!(parsed.path(), Some("/"));
        assert_eq!(parsed.http_only(), Some(true));
        assert!(parsed.max_age().is_none());
    }
}
