use reqwest::StatusCode;
use thiserror::Error;

/// What every failure collapses to when shown to a person
pub const GENERIC_FAILURE: &str = "Ocorreu um erro inesperado.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Message for a transient notice. Only a message sent by the server
    /// survives; transport, status and decode failures all read the same.
    pub fn notice(&self) -> String {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            ClientError::InvalidInput(message) => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_preferred() {
        let err = ClientError::Status {
            status: StatusCode::CONFLICT,
            message: Some("Pedido já finalizado".into()),
        };
        assert_eq!(err.notice(), "Pedido já finalizado");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn everything_else_is_generic() {
        let err = ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.notice(), GENERIC_FAILURE);
        assert_eq!(ClientError::NotFound("cep".into()).notice(), GENERIC_FAILURE);
    }
}
