//! Request error types.

use thiserror::Error;

/// Uniform failure of one logical request, including every page it drained.
///
/// Every variant names the URL that failed so a log line alone is enough
/// to reproduce the call.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid request URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("pagination ceiling reached after {pages} pages at {url}")]
    PageLimit { url: String, pages: u32 },
}

impl RequestError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            RequestError::InvalidUrl { url, .. }
            | RequestError::Transport { url, .. }
            | RequestError::Status { url, .. }
            | RequestError::Decode { url, .. }
            | RequestError::PageLimit { url, .. } => url,
        }
    }

    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("timed out: {err}")
        } else {
            err.to_string()
        };
        RequestError::Transport {
            url: url.to_string(),
            message,
        }
    }

    pub(crate) fn decode(url: &str, err: impl std::fmt::Display) -> Self {
        RequestError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

pub type RequestResult<T> = Result<T, RequestError>;
