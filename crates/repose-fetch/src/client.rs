use std::borrow::Cow;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use repose_reactive::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::body::FormData;
use crate::error::TransportError;

/// Fully resolved request handed to an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<OutgoingBody>,
}

/// Body after normalization: JSON objects have already become text.
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingBody {
    Text(String),
    Bytes(Bytes),
    Multipart(FormData),
}

impl OutgoingBody {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OutgoingBody::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// True for 200–299.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport used by `use_fetch`. Implementations must not interpret the
/// status code; a 404 is still `Ok(response)`.
pub trait HttpClient {
    fn send(&self, request: Request) -> LocalBoxFuture<'static, Result<Response, TransportError>>;
}
