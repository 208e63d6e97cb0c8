//! Error type returned by the currency API client.

/// Errors surfaced by [`crate::OpenCurrencyX`] endpoint calls.
#[derive(Debug)]
pub enum ClientError {
    /// Every attempt failed. Carries the string form of the final failure,
    /// whatever its cause (HTTP error status, timeout, refused connection).
    RequestFailed(String),
    /// A 2xx response whose body is not valid JSON. Not retried.
    InvalidJson(serde_json::Error),
}

impl ClientError {
    /// The message of the underlying failure.
    pub fn message(&self) -> String {
        match self {
            ClientError::RequestFailed(msg) => msg.clone(),
            ClientError::InvalidJson(e) => e.to_string(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::RequestFailed(msg) => write!(f, "{}", msg),
            ClientError::InvalidJson(e) => write!(f, "Invalid JSON response: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::RequestFailed(_) => None,
            ClientError::InvalidJson(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::InvalidJson(e)
    }
}
