//! # Request state
//!
//! `use_fetch` wraps one parameterized HTTP call in signals:
//!
//! - `data`: last decoded body, cleared on every execution.
//! - `status`: last status code seen.
//! - `error`: last failure (`FetchError`), cleared on every execution.
//! - `is_loading` / `is_success`: lifecycle flags.
//!
//! ```rust
//! use repose_fetch::*;
//! use repose_reactive::*;
//! # use http::{HeaderMap, StatusCode};
//! # struct Canned;
//! # impl HttpClient for Canned {
//! #     fn send(&self, _: Request) -> LocalBoxFuture<'static, Result<Response, TransportError>> {
//! #         Box::pin(async { Ok::<_, TransportError>(Response::new(StatusCode::OK, HeaderMap::new(), "[1,2,3]")) })
//! #     }
//! # }
//!
//! let spawner = LocalSpawner::new();
//! let runtime = FetchRuntime::new(Canned, spawner.clone());
//!
//! let page = signal(String::from("/items?page=1"));
//! let items = use_fetch::<Vec<u32>>(&runtime, &page, FetchOptions::default());
//! assert!(items.is_loading().get());
//!
//! spawner.run_until_stalled();
//! assert_eq!(items.data().get(), Some(vec![1, 2, 3]));
//!
//! // a new URL re-fetches on its own
//! page.set("/items?page=2".into());
//! assert_eq!(spawner.pending(), 1);
//! ```
//!
//! Plain JSON object bodies (`FetchOptions::json`) are encoded at send time,
//! after unwrapping any cells among their values, and get
//! `Content-Type: application/json` unless the caller set one. Bytes, text and
//! multipart bodies go out untouched.
//!
//! Errors never escape `execute()`; watch the `error` signal instead.
//!
//! With the default `reqwest` feature, pair [`ReqwestClient`] with
//! `repose_reactive::TokioSpawner` on native targets; its futures need a Tokio
//! reactor.

pub mod body;
pub mod client;
pub mod error;
pub mod fetch;
pub mod options;
#[cfg(feature = "reqwest")]
pub mod reqwest_client;

#[cfg(test)]
mod tests;

pub use body::{BodyValue, FormData, FormPart, JsonBody, RequestBody};
pub use client::{HttpClient, OutgoingBody, Request, Response};
pub use error::{FetchError, HttpError, TransportError};
pub use fetch::{FetchRuntime, UseFetch, use_fetch};
pub use options::FetchOptions;
#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
