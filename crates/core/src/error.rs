use thiserror::Error;

/// Failure taxonomy shared by every network fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("not found")]
    NotFound,
    #[error("network unreachable: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("server responded with {status}: {message}")]
    Http { status: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
    /// A newer request for the same purpose superseded this one.
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// Worth retrying once at the transport layer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }

    /// Worth offering the reader a manual retry. Missing chapters and
    /// malformed payloads will fail the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout => true,
            FetchError::Http { status, .. } => *status >= 500,
            FetchError::NotFound | FetchError::Decode(_) | FetchError::Cancelled => false,
        }
    }

    pub fn user_message(&self) -> String {
        let message = match self {
            FetchError::NotFound => "Chapter not found.".to_string(),
            FetchError::Network(_) => "Network unavailable.".to_string(),
            FetchError::Timeout => "Slow connection: the request timed out.".to_string(),
            FetchError::Http { status, .. } => format!("Server error ({status})."),
            FetchError::Decode(_) => "The server sent an unexpected response.".to_string(),
            FetchError::Cancelled => return String::new(),
        };
        if self.is_transient() {
            format!("{message} Press r to retry.")
        } else {
            message
        }
    }
}
