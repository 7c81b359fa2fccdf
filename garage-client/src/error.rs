//! Error types for the data access layer.

use garage_core::CoreError;

/// Failure of a read or write against the remote API.
///
/// Errors are values: the cache stores them beside the last good payload and
/// every caller decides how to present them. The type is `Clone` so one
/// failed request can be handed to every deduplicated waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never completed (connect, TLS, timeout, body read).
    #[error("Transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success status or a failure envelope.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl ClientError {
    /// Transport failures and 5xx answers are worth another attempt; 4xx are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Server { status, .. } => *status >= 500,
            ClientError::Decode(_) | ClientError::Config(_) => false,
        }
    }

    /// The server refused the credentials (or their absence).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Server { status: 401 | 403, .. })
    }

    /// Message suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            // A failure envelope carried on a 2xx response.
            CoreError::ServerFailure { message } => Self::Server {
                status: 200,
                message,
            },
            other => Self::Decode(other.to_string()),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classification() {
        assert!(ClientError::Transport("reset".into()).is_retryable());
        assert!(ClientError::Server {
            status: 503,
            message: "busy".into()
        }
        .is_retryable());
        assert!(!ClientError::Server {
            status: 401,
            message: "no".into()
        }
        .is_retryable());
        assert!(!ClientError::Decode("bad".into()).is_retryable());
    }

    #[test]
    fn unauthorized_detection() {
        let err = ClientError::Server {
            status: 401,
            message: "Please log in".into(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Please log in");
    }

    #[test]
    fn failure_envelope_maps_to_server_error() {
        let err: ClientError = CoreError::ServerFailure {
            message: "duplicate".into(),
        }
        .into();
        assert_eq!(
            err,
            ClientError::Server {
                status: 200,
                message: "duplicate".into()
            }
        );
    }
}
