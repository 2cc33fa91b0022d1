use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use http::StatusCode;
use http::header::{CONTENT_TYPE, HeaderValue};
use repose_reactive::{
    Dispose, LocalBoxFuture, MaybeSignal, ReadSignal, Signal, Spawn, untrack, watch_deep,
};
use serde::de::DeserializeOwned;

use crate::body::RequestBody;
use crate::client::{HttpClient, OutgoingBody, Request};
use crate::error::{FetchError, HttpError};
use crate::options::FetchOptions;

/// Transport plus the executor that runs re-fetches triggered by watchers.
#[derive(Clone)]
pub struct FetchRuntime {
    client: Rc<dyn HttpClient>,
    spawner: Rc<dyn Spawn>,
}

impl FetchRuntime {
    pub fn new(client: impl HttpClient + 'static, spawner: impl Spawn + 'static) -> Self {
        Self {
            client: Rc::new(client),
            spawner: Rc::new(spawner),
        }
    }

    pub fn from_rc(client: Rc<dyn HttpClient>, spawner: Rc<dyn Spawn>) -> Self {
        Self { client, spawner }
    }
}

/// Reactive state of one parameterized HTTP call. Clones share state.
pub struct UseFetch<T: 'static> {
    inner: Rc<FetchInner<T>>,
}

impl<T: 'static> Clone for UseFetch<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct FetchInner<T: 'static> {
    runtime: FetchRuntime,
    url: MaybeSignal<String>,
    options: MaybeSignal<FetchOptions>,

    data: Signal<Option<T>>,
    status: Signal<Option<StatusCode>>,
    error: Signal<Option<Rc<FetchError>>>,
    is_loading: Signal<bool>,
    is_success: Signal<bool>,

    // Only the newest execution may write results.
    generation: Cell<u64>,
    watcher: RefCell<Option<Dispose>>,
}

/// Creates the request state and, depending on `immediate`, starts the first
/// execution and the re-fetch watcher.
///
/// `immediate` is read once from the initial options. When it is true and the
/// URL or the options are reactive, every change to them (including nested
/// body cells) spawns a new `execute()` on the runtime's spawner. When it is
/// false nothing runs until the caller invokes [`UseFetch::execute`].
pub fn use_fetch<T>(
    runtime: &FetchRuntime,
    url: impl Into<MaybeSignal<String>>,
    options: impl Into<MaybeSignal<FetchOptions>>,
) -> UseFetch<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let url = url.into();
    let options = options.into();
    let immediate = options.with_untracked(|o| o.immediate);
    let reactive = url.is_reactive() || options.is_reactive();

    let fetch = UseFetch {
        inner: Rc::new(FetchInner {
            runtime: runtime.clone(),
            url,
            options,
            data: Signal::new(None),
            status: Signal::new(None),
            error: Signal::new(None),
            is_loading: Signal::new(false),
            is_success: Signal::new(false),
            generation: Cell::new(0),
            watcher: RefCell::new(None),
        }),
    };

    if immediate {
        runtime.spawner.spawn_local(fetch.execute());
    }

    if immediate && reactive {
        let weak: Weak<FetchInner<T>> = Rc::downgrade(&fetch.inner);
        let sources = (fetch.inner.url.clone(), fetch.inner.options.clone());
        let dispose = watch_deep(sources, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            log::debug!("use_fetch: inputs changed, re-executing");
            let fut = UseFetch { inner: inner.clone() }.execute();
            inner.runtime.spawner.spawn_local(fut);
        });
        *fetch.inner.watcher.borrow_mut() = Some(dispose);
    } else if reactive {
        log::debug!("use_fetch: immediate = false, reactive inputs will not auto-trigger");
    }

    fetch
}

impl<T> UseFetch<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    /// Runs one request cycle.
    ///
    /// State is reset and the request is built before this returns; the
    /// returned future sends it and records the outcome. Failures land in
    /// [`error`](Self::error), never in the return value.
    pub fn execute(&self) -> LocalBoxFuture<'static, ()> {
        let inner = self.inner.clone();
        let generation = inner.begin();
        let prepared = untrack(|| inner.prepare());

        Box::pin(async move {
            let outcome = match prepared {
                Ok(request) => inner.perform(request, generation).await,
                Err(e) => Err(e),
            };
            inner.finish(generation, outcome);
        })
    }
}

impl<T: 'static> UseFetch<T> {
    pub fn data(&self) -> ReadSignal<Option<T>> {
        self.inner.data.read_only()
    }

    pub fn status(&self) -> ReadSignal<Option<StatusCode>> {
        self.inner.status.read_only()
    }

    pub fn error(&self) -> ReadSignal<Option<Rc<FetchError>>> {
        self.inner.error.read_only()
    }

    pub fn is_loading(&self) -> ReadSignal<bool> {
        self.inner.is_loading.read_only()
    }

    pub fn is_success(&self) -> ReadSignal<bool> {
        self.inner.is_success.read_only()
    }

    /// Stops auto re-execution. Requests already in flight still settle.
    pub fn dispose(&self) {
        if let Some(d) = self.inner.watcher.borrow_mut().take() {
            d.run();
        }
    }
}

impl<T> FetchInner<T>
where
    T: DeserializeOwned + 'static,
{
    fn begin(&self) -> u64 {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        self.is_loading.set(true);
        self.is_success.set(false);
        self.error.set(None);
        self.data.set(None);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    fn prepare(&self) -> Result<Request, FetchError> {
        let url = self.url.get_untracked();
        let options = self.options.get_untracked();
        let mut headers = options.header_map()?;

        let body = match options.body.as_ref().map(MaybeSignal::get_untracked) {
            None => None,
            Some(RequestBody::Json(json)) => {
                let text = json
                    .to_json_string()
                    .map_err(|e| FetchError::Request(format!("body is not valid JSON: {e}")))?;
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                Some(OutgoingBody::Text(text))
            }
            Some(RequestBody::Bytes(bytes)) => Some(OutgoingBody::Bytes(bytes)),
            Some(RequestBody::Form(form)) => Some(OutgoingBody::Multipart(form)),
            Some(RequestBody::Text(text)) => Some(OutgoingBody::Text(text)),
        };

        Ok(Request {
            method: options.method,
            url,
            headers,
            body,
        })
    }

    async fn perform(&self, request: Request, generation: u64) -> Result<Option<T>, FetchError> {
        log::debug!("use_fetch: {} {}", request.method, request.url);
        let response = self.runtime.client.send(request).await?;

        if self.is_current(generation) {
            self.status.set(Some(response.status()));
        }

        if !response.ok() {
            return Err(HttpError { response }.into());
        }
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(response.json()?))
    }

    fn finish(&self, generation: u64, outcome: Result<Option<T>, FetchError>) {
        if !self.is_current(generation) {
            log::debug!("use_fetch: dropping result of superseded request #{generation}");
            return;
        }
        match outcome {
            Ok(data) => {
                self.data.set(data);
                self.is_success.set(true);
            }
            Err(e) => {
                log::debug!("use_fetch: request failed: {e}");
                self.error.set(Some(Rc::new(e)));
            }
        }
        self.is_loading.set(false);
    }
}

impl<T: 'static> Drop for FetchInner<T> {
    fn drop(&mut self) {
        if let Some(d) = self.watcher.get_mut().take() {
            d.run();
        }
    }
}
