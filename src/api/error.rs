use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API key is not a valid HTTP header value")]
    InvalidApiKey,

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    // The provider answered, but not with a success status.
    #[error("Request to {url} failed with status {status}: {message}")]
    Request {
        url: String,
        status: reqwest::StatusCode,
        message: String,
    },

    // Connection refused, DNS failure, timeout, body read failure.
    #[error("Network request failed for {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status of a rejected request, if the provider answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}
