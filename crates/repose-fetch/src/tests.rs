use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use bytes::Bytes;
use futures::channel::oneshot;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, StatusCode};
use repose_reactive::{LocalBoxFuture, LocalSpawner, Scope, Spawn, signal};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::*;

type Reply = LocalBoxFuture<'static, Result<Response, TransportError>>;

#[derive(Default)]
struct MockClient {
    replies: RefCell<VecDeque<Reply>>,
    sent: RefCell<Vec<Request>>,
}

fn response(status: u16, body: &'static str) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    Response::new(status, HeaderMap::new(), body)
}

impl MockClient {
    fn reply(&self, status: u16, body: &'static str) -> &Self {
        let reply: Result<Response, TransportError> = Ok(response(status, body));
        self.replies.borrow_mut().push_back(Box::pin(async move { reply }));
        self
    }

    /// Queues a reply that only arrives once the returned sender fires.
    fn gate(&self, status: u16, body: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        let reply = response(status, body);
        self.replies.borrow_mut().push_back(Box::pin(async move {
            let _ = rx.await;
            Ok::<_, TransportError>(reply)
        }));
        tx
    }

    fn fail(&self, message: &str) -> &Self {
        let reply: Result<Response, TransportError> =
            Err(TransportError::Other(message.to_owned()));
        self.replies.borrow_mut().push_back(Box::pin(async move { reply }));
        self
    }

    fn urls(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|r| r.url.clone()).collect()
    }

    fn last(&self) -> Request {
        self.sent.borrow().last().cloned().unwrap()
    }
}

impl HttpClient for Rc<MockClient> {
    fn send(&self, request: Request) -> LocalBoxFuture<'static, Result<Response, TransportError>> {
        self.sent.borrow_mut().push(request);
        let reply = self.replies.borrow_mut().pop_front();
        reply.unwrap_or_else(|| {
            Box::pin(async { Err::<Response, _>(TransportError::Other("no reply queued".into())) })
        })
    }
}

fn setup() -> (Rc<MockClient>, LocalSpawner, FetchRuntime) {
    let client = Rc::new(MockClient::default());
    let spawner = LocalSpawner::new();
    let runtime = FetchRuntime::new(client.clone(), spawner.clone());
    (client, spawner, runtime)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct User {
    id: u32,
    name: String,
}

fn manual() -> FetchOptions {
    FetchOptions::new().immediate(false)
}

fn assert_settled<T: 'static>(fetch: &UseFetch<T>) {
    assert!(!fetch.is_loading().get());
    let success = fetch.is_success().get();
    let failed = fetch.error().get().is_some();
    assert!(success ^ failed, "success={success} failed={failed}");
}

#[test]
fn immediate_runs_once_at_construction() {
    let (client, spawner, runtime) = setup();
    client.reply(200, r#"{"id":1,"name":"Ada"}"#);

    let user = use_fetch::<User>(&runtime, "/users/1", FetchOptions::default());
    assert!(user.is_loading().get());
    assert!(!user.is_success().get());
    assert_eq!(spawner.pending(), 1);

    spawner.run_until_stalled();
    assert_settled(&user);
    assert!(user.is_success().get());
    assert_eq!(user.status().get(), Some(StatusCode::OK));
    assert_eq!(
        user.data().get(),
        Some(User {
            id: 1,
            name: "Ada".into()
        })
    );
    assert_eq!(client.urls(), vec!["/users/1"]);
}

#[test]
fn not_immediate_waits_for_execute() {
    let (client, spawner, runtime) = setup();
    client.reply(200, "[]");

    let list = use_fetch::<Vec<u32>>(&runtime, "/list", manual());
    assert_eq!(spawner.pending(), 0);
    assert!(!list.is_loading().get());
    assert!(client.sent.borrow().is_empty());

    pollster::block_on(list.execute());
    assert_settled(&list);
    assert_eq!(list.data().get(), Some(vec![]));
}

#[test]
fn not_found_is_an_http_error_with_the_response() {
    let (client, _spawner, runtime) = setup();
    client.reply(404, r#"{"detail":"missing"}"#);

    let user = use_fetch::<User>(&runtime, "/users/9", manual());
    pollster::block_on(user.execute());

    assert_settled(&user);
    assert_eq!(user.data().get(), None);
    assert_eq!(user.status().get(), Some(StatusCode::NOT_FOUND));
    let error = user.error().get().unwrap();
    let response = error.response().unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text(), r#"{"detail":"missing"}"#);
    assert_eq!(error.to_string(), "HTTP error! status: 404");
}

#[test]
fn no_content_skips_parsing() {
    let (client, _spawner, runtime) = setup();
    client.reply(204, "this is not json");

    let del = use_fetch::<Value>(&runtime, "/users/1", manual().method(Method::DELETE));
    pollster::block_on(del.execute());

    assert_settled(&del);
    assert!(del.is_success().get());
    assert_eq!(del.data().get(), None);
    assert_eq!(del.status().get(), Some(StatusCode::NO_CONTENT));
    assert_eq!(client.last().method, Method::DELETE);
}

#[test]
fn bad_json_is_a_decoding_error() {
    let (client, _spawner, runtime) = setup();
    client.reply(200, "<html>");

    let user = use_fetch::<User>(&runtime, "/users/1", manual());
    pollster::block_on(user.execute());

    assert_settled(&user);
    assert!(matches!(
        user.error().get().as_deref(),
        Some(FetchError::Decoding(_))
    ));
    assert_eq!(user.status().get(), Some(StatusCode::OK));
    assert_eq!(user.data().get(), None);
}

#[test]
fn transport_failure_is_stored_not_returned() {
    let (client, _spawner, runtime) = setup();
    client.fail("connection refused");

    let user = use_fetch::<User>(&runtime, "/users/1", manual());
    pollster::block_on(user.execute());

    assert_settled(&user);
    assert!(matches!(
        user.error().get().as_deref(),
        Some(FetchError::Transport(_))
    ));
    assert_eq!(user.status().get(), None);
}

#[test]
fn json_body_is_encoded_with_cells_unwrapped() {
    let (client, _spawner, runtime) = setup();
    client.reply(201, r#"{"id":7,"name":"Ada"}"#);

    let name = signal(json!("Ada"));
    let body = JsonBody::new()
        .field("name", &name)
        .field("tags", json!(["admin"]));
    let create = use_fetch::<User>(
        &runtime,
        "/users",
        manual().method(Method::POST).json(body),
    );
    name.set(json!("Ada Lovelace"));
    pollster::block_on(create.execute());

    let sent = client.last();
    assert_eq!(sent.headers.get(CONTENT_TYPE).unwrap(), "application/json");
    let text = sent.body.as_ref().and_then(OutgoingBody::as_text).unwrap();
    let parsed: Value = serde_json::from_str(text).unwrap();
    assert_eq!(parsed, json!({ "name": "Ada Lovelace", "tags": ["admin"] }));
    assert!(create.is_success().get());
}

#[test]
fn explicit_content_type_is_kept() {
    let (client, _spawner, runtime) = setup();
    client.reply(200, "null");

    let opts = manual()
        .method(Method::PUT)
        .header("Content-Type", "application/merge-patch+json")
        .json(json!({ "name": "Ada" }));
    let patch = use_fetch::<Value>(&runtime, "/users/1", opts);
    pollster::block_on(patch.execute());

    let sent = client.last();
    let values: Vec<_> = sent.headers.get_all(CONTENT_TYPE).iter().collect();
    assert_eq!(values, vec!["application/merge-patch+json"]);
}

#[test]
fn bytes_and_multipart_bodies_are_not_reencoded() {
    let (client, _spawner, runtime) = setup();
    client.reply(200, "null").reply(200, "null");

    let raw = Bytes::from_static(b"\x89PNG");
    let upload = use_fetch::<Value>(
        &runtime,
        "/blob",
        manual().method(Method::POST).bytes(raw.clone()),
    );
    pollster::block_on(upload.execute());
    let sent = client.last();
    assert!(sent.headers.get(CONTENT_TYPE).is_none());
    assert_eq!(sent.body, Some(OutgoingBody::Bytes(raw)));

    let form = FormData::new()
        .text("title", "cat")
        .file("image", "cat.png", Some("image/png"), &b"\x89PNG"[..]);
    let multipart = use_fetch::<Value>(
        &runtime,
        "/form",
        manual().method(Method::POST).form(form.clone()),
    );
    pollster::block_on(multipart.execute());
    let sent = client.last();
    assert!(sent.headers.get(CONTENT_TYPE).is_none());
    assert_eq!(sent.body, Some(OutgoingBody::Multipart(form)));
}

#[test]
fn invalid_header_fails_without_sending() {
    let (client, _spawner, runtime) = setup();

    let bad = use_fetch::<Value>(&runtime, "/x", manual().header("bad header", "1"));
    pollster::block_on(bad.execute());

    assert_settled(&bad);
    assert!(matches!(
        bad.error().get().as_deref(),
        Some(FetchError::Request(_))
    ));
    assert!(client.sent.borrow().is_empty());
}

#[test]
fn reactive_url_refetches_once_per_change() {
    let (client, spawner, runtime) = setup();
    client.reply(200, "1").reply(200, "2").reply(200, "3");

    let url = signal(String::from("/n/1"));
    let n = use_fetch::<u32>(&runtime, &url, FetchOptions::default());
    spawner.run_until_stalled();
    assert_eq!(n.data().get(), Some(1));

    url.set("/n/2".into());
    assert_eq!(spawner.pending(), 1);
    assert!(n.is_loading().get());
    assert_eq!(n.data().get(), None);
    spawner.run_until_stalled();

    url.set("/n/3".into());
    assert_eq!(spawner.pending(), 1);
    spawner.run_until_stalled();

    assert_eq!(client.urls(), vec!["/n/1", "/n/2", "/n/3"]);
    assert_eq!(n.data().get(), Some(3));
}

#[test]
fn reactive_url_without_immediate_never_auto_runs() {
    let (client, spawner, runtime) = setup();

    let url = signal(String::from("/a"));
    let _f = use_fetch::<Value>(&runtime, &url, manual());
    url.set("/b".into());
    url.set("/c".into());

    assert_eq!(spawner.pending(), 0);
    assert!(client.sent.borrow().is_empty());
}

#[test]
fn immediate_is_read_once_at_construction() {
    let (_client, spawner, runtime) = setup();

    let options = signal(manual());
    let _f = use_fetch::<Value>(&runtime, "/a", &options);
    options.update(|o| o.immediate = true);

    assert_eq!(spawner.pending(), 0);
}

#[test]
fn nested_body_cell_change_counts_as_options_change() {
    let (client, spawner, runtime) = setup();
    client.reply(200, "null").reply(200, "null");

    let query = signal(json!("rust"));
    let options = signal(
        FetchOptions::new()
            .method(Method::POST)
            .json(JsonBody::new().field("q", &query)),
    );
    let search = use_fetch::<Value>(&runtime, "/search", &options);
    spawner.run_until_stalled();

    query.set(json!("repose"));
    assert_eq!(spawner.pending(), 1);
    spawner.run_until_stalled();

    let text = client.last().body.unwrap();
    let parsed: Value = serde_json::from_str(text.as_text().unwrap()).unwrap();
    assert_eq!(parsed, json!({ "q": "repose" }));
    assert!(search.is_success().get());
}

#[test]
fn static_inputs_never_auto_run_again() {
    let (client, spawner, runtime) = setup();
    client.reply(200, "null");

    let body = signal(json!(1));
    let opts = FetchOptions::new().json(JsonBody::new().field("n", &body));
    let _f = use_fetch::<Value>(&runtime, "/static", opts);
    spawner.run_until_stalled();

    body.set(json!(2));
    assert_eq!(spawner.pending(), 0);
    assert_eq!(client.urls().len(), 1);
}

#[test]
fn superseded_result_is_dropped() {
    let (client, _spawner, runtime) = setup();
    client.reply(200, "2").reply(200, "1");

    let n = use_fetch::<u32>(&runtime, "/n", manual());
    let first = n.execute();
    let second = n.execute();

    // the newer request settles first, then the stale one resolves
    pollster::block_on(second);
    assert_eq!(n.data().get(), Some(2));
    pollster::block_on(first);

    assert_settled(&n);
    assert_eq!(n.data().get(), Some(2));
    assert_eq!(client.sent.borrow().len(), 2);
}

#[test]
fn disposing_the_scope_stops_refetching() {
    let (client, spawner, runtime) = setup();
    client.reply(200, "null");

    let url = signal(String::from("/a"));
    let scope = Scope::new();
    let _f = scope.run(|| use_fetch::<Value>(&runtime, &url, FetchOptions::default()));
    spawner.run_until_stalled();

    scope.dispose();
    url.set("/b".into());
    assert_eq!(spawner.pending(), 0);
    assert_eq!(client.urls(), vec!["/a"]);
}

#[test]
fn dispose_handle_stops_refetching() {
    let (_client, spawner, runtime) = setup();

    let url = signal(String::from("/a"));
    let f = use_fetch::<Value>(&runtime, &url, FetchOptions::default());
    spawner.run_until_stalled();
    f.dispose();

    url.set("/b".into());
    assert_eq!(spawner.pending(), 0);
}

#[test]
fn overlapping_executions_keep_only_the_newest() {
    let (client, spawner, runtime) = setup();
    let release_first = client.gate(200, "1");
    client.reply(200, "2");

    let url = signal(String::from("/n/1"));
    let n = use_fetch::<u32>(&runtime, &url, FetchOptions::default());
    assert_eq!(spawner.run_until_stalled(), 0);
    assert_eq!(spawner.pending(), 1);
    assert!(n.is_loading().get());

    // a second execution starts while the first is still waiting
    url.set("/n/2".into());
    assert_eq!(spawner.pending(), 2);
    assert_eq!(spawner.run_until_stalled(), 1);
    assert_eq!(client.urls(), vec!["/n/1", "/n/2"]);
    assert_settled(&n);
    assert_eq!(n.data().get(), Some(2));

    release_first.send(()).unwrap();
    assert_eq!(spawner.run_until_stalled(), 1);
    assert_eq!(spawner.pending(), 0);
    assert_settled(&n);
    assert_eq!(n.data().get(), Some(2));
}

#[test]
fn stale_failure_leaves_newer_request_loading() {
    let (client, spawner, runtime) = setup();
    let release_first = client.gate(500, "boom");
    let release_second = client.gate(200, "2");

    let n = use_fetch::<u32>(&runtime, "/n", manual());
    spawner.spawn_local(n.execute());
    spawner.spawn_local(n.execute());
    assert_eq!(spawner.run_until_stalled(), 0);
    assert_eq!(client.sent.borrow().len(), 2);

    release_first.send(()).unwrap();
    assert_eq!(spawner.run_until_stalled(), 1);
    assert!(n.is_loading().get());
    assert!(n.error().get().is_none());
    assert_eq!(n.status().get(), None);

    release_second.send(()).unwrap();
    spawner.run_until_stalled();
    assert_settled(&n);
    assert_eq!(n.data().get(), Some(2));
    assert_eq!(n.status().get(), Some(StatusCode::OK));
}
