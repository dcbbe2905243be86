//! Identity state and role gating for dashboard views.
//!
//! This is a UX gate only: it decides what to show. The REST API enforces
//! access on its own.

use async_trait::async_trait;

use crate::auth::Identity;
use crate::client::ClientError;
use crate::models::Role;

pub const LOGIN_ROUTE: &str = "/auth";
pub const ADMIN_HOME_ROUTE: &str = "/home-admin";
pub const CLIENT_HOME_ROUTE: &str = "/home-client";

pub const ACCESS_DENIED_TITLE: &str = "Acesso Negado";
pub const ACCESS_DENIED_MESSAGE: &str = "Você não tem permissão para acessar esta página.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Loading,
    Anonymous,
    Authenticated(Identity),
}

impl AuthState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }
}

/// Outcome of gating one view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<'a> {
    /// Identity not resolved yet; show a waiting indicator
    Pending,
    Redirect(&'static str),
    Denied,
    Granted(&'a Identity),
}

/// Gate a view. `roles: None` admits any logged-in identity.
pub fn evaluate<'a>(state: &'a AuthState, roles: Option<&[Role]>) -> Access<'a> {
    match state {
        AuthState::Loading => Access::Pending,
        AuthState::Anonymous => Access::Redirect(LOGIN_ROUTE),
        AuthState::Authenticated(identity) => match roles {
            Some(roles) if !roles.contains(&identity.role) => Access::Denied,
            _ => Access::Granted(identity),
        },
    }
}

/// Where to send the caller once the identity is known
pub fn landing_route(state: &AuthState) -> Option<&'static str> {
    match state {
        AuthState::Loading => None,
        AuthState::Anonymous => Some(LOGIN_ROUTE),
        AuthState::Authenticated(identity) => Some(match identity.role {
            Role::Admin => ADMIN_HOME_ROUTE,
            Role::Client => CLIENT_HOME_ROUTE,
        }),
    }
}

/// Anything that can answer "who is calling?"
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn fetch_identity(&self) -> Result<Option<Identity>, ClientError>;
}

/// Holds the caller's identity for the lifetime of a view tree
pub struct AuthContext<S> {
    source: S,
    state: AuthState,
}

impl<S: IdentitySource> AuthContext<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: AuthState::Loading,
        }
    }

    /// Resolve the identity. Errors and refusals both end up `Anonymous`.
    pub async fn load(&mut self) -> &AuthState {
        self.state = AuthState::Loading;

        self.state = match self.source.fetch_identity().await {
            Ok(Some(identity)) => AuthState::Authenticated(identity),
            Ok(None) => {
                tracing::warn!("Session endpoint reported no logged-in user");
                AuthState::Anonymous
            }
            Err(e) => {
                tracing::error!("Error loading user: {}", e);
                AuthState::Anonymous
            }
        };

        &self.state
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn gate(&self, roles: Option<&[Role]>) -> Access<'_> {
        evaluate(&self.state, roles)
    }

    /// Forget the identity; returns the route to show next
    pub fn logout(&mut self) -> &'static str {
        self.state = AuthState::Anonymous;
        LOGIN_ROUTE
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
