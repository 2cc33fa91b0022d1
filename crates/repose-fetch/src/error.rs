use thiserror::Error;

use crate::client::Response;

/// Everything that can end an `execute()` cycle without data.
///
/// None of these escape `execute()`; they are stored in the `error` signal.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("failed to decode response body: {0}")]
    Decoding(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("invalid request: {0}")]
    Request(String),
}

impl FetchError {
    /// The carried response, for `Http` failures.
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchError::Http(e) => Some(&e.response),
            _ => None,
        }
    }
}

/// A response arrived but its status was outside 200–299.
#[derive(Debug, Error)]
#[error("HTTP error! status: {}", .response.status().as_u16())]
pub struct HttpError {
    pub response: Response,
}

/// The request never produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}
