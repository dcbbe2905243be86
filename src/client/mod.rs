//! HTTP client for the UaiFood REST API.
//!
//! One thin method per dashboard fetch or mutation. Paging state, debouncing
//! and superseded-result handling live with the caller.

pub mod error;
pub mod items;
pub mod orders;
pub mod params;
pub mod session;
pub mod users;

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::pagination::{Page, PagedResponse};

pub use error::{ClientError, GENERIC_FAILURE};
pub use items::ItemsQuery;
pub use orders::{OrderFilters, OrdersQuery, OrdersScope};
pub use params::QueryParams;
pub use session::SessionClient;
pub use users::UsersQuery;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Error body shape used by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        // Validate early so every later join is infallible in practice.
        Url::parse(base_url)?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Session token forwarded as a bearer credential
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<Page<T>, ClientError> {
        let request = self.http.get(self.url(path)?).query(params.as_slice());
        let response = check(self.authorize(request).send().await?).await?;
        let paged: PagedResponse<T> = response.json().await?;

        Ok(Page::from(paged))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.http.get(self.url(path)?);
        let response = check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        let request = self.http.put(self.url(path)?).json(body);
        check(self.authorize(request).send().await?).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(path)?);
        check(self.authorize(request).send().await?).await?;
        Ok(())
    }
}

/// Turn non-2xx responses into `ClientError::Status`, keeping the server's message
pub(crate) async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let path = response.url().path().to_string();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);

    tracing::warn!(
        "{} responded {}: {}",
        path,
        status,
        message.as_deref().unwrap_or("(no message)")
    );
    Err(ClientError::Status { status, message })
}
