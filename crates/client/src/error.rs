use thiserror::Error;

/// Failure talking to the warehouse backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never got an HTTP response (DNS, connect, reset, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend reported that the requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The client was configured with unusable settings.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Text shown to the operator: the backend's own message when there is one.
    pub fn operator_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
