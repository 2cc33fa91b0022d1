use http::{HeaderMap, HeaderName, HeaderValue, Method};
use repose_reactive::{DeepTrack, MaybeSignal, Signal};

use crate::body::{FormData, JsonBody, RequestBody};
use crate::error::FetchError;

/// Request configuration for `use_fetch`.
///
/// Headers are kept as plain pairs and only validated when a request is built,
/// so a bad header shows up in the `error` signal like any other failure.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<MaybeSignal<RequestBody>>,
    /// Run once at construction and re-run on reactive input changes.
    pub immediate: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            immediate: true,
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(MaybeSignal::Static(body.into()));
        self
    }

    pub fn json(self, body: impl Into<JsonBody>) -> Self {
        self.body(RequestBody::Json(body.into()))
    }

    pub fn form(self, form: FormData) -> Self {
        self.body(RequestBody::Form(form))
    }

    pub fn bytes(self, bytes: impl Into<bytes::Bytes>) -> Self {
        self.body(RequestBody::Bytes(bytes.into()))
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.body(RequestBody::Text(text.into()))
    }

    /// Body whose whole value is reactive.
    pub fn body_signal(mut self, body: &Signal<RequestBody>) -> Self {
        self.body = Some(MaybeSignal::Dynamic(body.clone()));
        self
    }

    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Builds the outgoing header set. Later pairs with the same name are
    /// appended, not replaced.
    pub fn header_map(&self) -> Result<HeaderMap, FetchError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::Request(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::Request(format!("header {name}: {e}")))?;
            map.append(name, value);
        }
        Ok(map)
    }
}

impl DeepTrack for FetchOptions {
    fn track_deep(&self) {
        self.body.track_deep();
    }
}
