use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{check, ClientError};
use crate::auth::Identity;
use crate::gate::IdentitySource;

/// Client for the session service (`/api/me`, `/api/session`)
#[derive(Debug, Clone)]
pub struct SessionClient {
    http: reqwest::Client,
    base_url: String,
    cookie_name: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

impl SessionClient {
    pub fn new(base_url: &str, cookie_name: &str, timeout: Duration) -> Result<Self, ClientError> {
        Url::parse(base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie_name: cookie_name.to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    fn with_cookie(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header(header::COOKIE, format!("{}={}", self.cookie_name, token)),
            None => request,
        }
    }

    /// GET /api/me. A 401 is an answer, not a failure: it means "nobody".
    pub async fn me(&self) -> Result<Option<Identity>, ClientError> {
        let request = self.with_cookie(self.http.get(self.url("/api/me")?));
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        let response = check(response).await?;
        Ok(Some(response.json().await?))
    }

    /// POST /api/session - have the service verify a token before it is stored
    pub async fn open(&self, token: &str) -> Result<Identity, ClientError> {
        let request = self
            .http
            .post(self.url("/api/session")?)
            .json(&json!({ "token": token }));
        let response = check(request.send().await?).await?;
        let envelope: Envelope<Identity> = response.json().await?;

        Ok(envelope.data)
    }

    /// DELETE /api/me
    pub async fn logout(&self) -> Result<(), ClientError> {
        let request = self.with_cookie(self.http.delete(self.url("/api/me")?));
        check(request.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentitySource for SessionClient {
    async fn fetch_identity(&self) -> Result<Option<Identity>, ClientError> {
        self.me().await
    }
}
