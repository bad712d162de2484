//! Contract tests for the authenticated request client, run against a
//! local HTTP fake. These pin the behavior the view layer depends on:
//! header decoration, the 401 logout path, 204 handling, and failure
//! surfacing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfdesk_core::models::IssueRequest;
use shelfdesk_core::{
    ApiClient, ApiError, Navigator, Notifier, Outcome, RequestDescriptor, SessionGuard,
    TokenStore, ToastKind,
};

#[derive(Default)]
struct RecordingNotifier {
    toasts: Mutex<Vec<(String, ToastKind)>>,
}

impl RecordingNotifier {
    fn toasts(&self) -> Vec<(String, ToastKind)> {
        self.toasts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        self.toasts.lock().unwrap().push((message.to_string(), kind));
    }
}

#[derive(Default)]
struct RecordingNavigator {
    logins: AtomicUsize,
}

impl RecordingNavigator {
    fn login_requests(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn request_login(&self) {
        self.logins.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    client: ApiClient,
    tokens: TokenStore,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
    _dir: TempDir,
}

fn harness(base_url: &str) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let tokens = TokenStore::new(dir.path().to_path_buf());
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());

    let client = ApiClient::new(
        base_url,
        tokens.clone(),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::clone(&navigator) as Arc<dyn Navigator>,
    )
    .unwrap();

    Harness {
        client,
        tokens,
        notifier,
        navigator,
        _dir: dir,
    }
}

#[tokio::test]
async fn guard_redirects_to_login_without_issuing_any_request() {
    let server = MockServer::start().await;
    let h = harness(&server.uri());

    let guard = SessionGuard::new(h.tokens.clone());
    let proceed = guard.check(h.navigator.as_ref());

    assert!(!proceed);
    assert_eq!(h.navigator.login_requests(), 1);
    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "no network call may precede login");
}

#[tokio::test]
async fn bearer_and_content_type_are_attached_and_caller_headers_coexist() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/"))
        .and(header("authorization", "Bearer sekrit"))
        .and(header("content-type", "application/json"))
        .and(header("x-request-source", "tui"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("sekrit", "meg").unwrap();

    let desc = RequestDescriptor::new(Method::GET, "/books/").with_header(
        HeaderName::from_static("x-request-source"),
        HeaderValue::from_static("tui"),
    );
    let outcome = h.client.request(desc).await;

    assert_eq!(outcome, Outcome::Success(json!([])));
}

#[tokio::test]
async fn success_wraps_the_exact_parsed_body() {
    let body = json!([{"id": 1, "title": "X", "author": "Y", "quantity": 0}]);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("sekrit", "meg").unwrap();

    let outcome = h
        .client
        .request(RequestDescriptor::new(Method::GET, "/books/"))
        .await;
    assert_eq!(outcome, Outcome::Success(body));
    assert!(h.notifier.toasts().is_empty());

    // The typed surface decodes the same payload
    let books = h.client.list_books().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].quantity, 0);
    assert!(!books[0].has_copies());
}

#[tokio::test]
async fn auth_failure_clears_store_and_redirects_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transactions/issue"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Invalid or expired token. Please log in again."})),
        )
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("stale", "meg").unwrap();

    let outcome = h
        .client
        .request(
            RequestDescriptor::new(Method::POST, "/transactions/issue")
                .with_body(json!({"book_id": 1, "member_id": 2})),
        )
        .await;

    assert_eq!(outcome, Outcome::AuthExpired);
    assert_eq!(h.tokens.get(), None, "credential must be gone immediately");
    assert_eq!(h.navigator.login_requests(), 1);
    assert!(h.notifier.toasts().is_empty(), "expiry shows no toast");
}

#[tokio::test]
async fn auth_failure_propagates_through_the_typed_surface() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transactions/issue"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("stale", "meg").unwrap();

    let request = IssueRequest {
        book_id: 1,
        member_id: 2,
    };
    let err = h.client.issue_book(&request).await.unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(h.tokens.get(), None);
    assert_eq!(h.navigator.login_requests(), 1);
    assert!(h.notifier.toasts().is_empty());
}

#[tokio::test]
async fn no_content_is_success_without_notification() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/books/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("sekrit", "meg").unwrap();

    let outcome = h
        .client
        .request(RequestDescriptor::new(Method::DELETE, "/books/1"))
        .await;
    assert_eq!(outcome, Outcome::NoContent);
    assert!(h.notifier.toasts().is_empty());

    h.client.delete_book(1).await.unwrap();
    assert!(h.notifier.toasts().is_empty());
}

#[tokio::test]
async fn application_failure_surfaces_the_detail_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transactions/issue"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({"detail": "No copies of this book are currently available"}),
        ))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("sekrit", "meg").unwrap();

    let outcome = h
        .client
        .request(
            RequestDescriptor::new(Method::POST, "/transactions/issue")
                .with_body(json!({"book_id": 1, "member_id": 2})),
        )
        .await;

    assert_eq!(
        outcome,
        Outcome::Failure("No copies of this book are currently available".to_string())
    );
    assert_eq!(
        h.notifier.toasts(),
        vec![(
            "No copies of this book are currently available".to_string(),
            ToastKind::Error
        )]
    );
    // The credential survives a non-auth failure
    assert_eq!(h.tokens.get().as_deref(), Some("sekrit"));
    assert_eq!(h.navigator.login_requests(), 0);
}

#[tokio::test]
async fn application_failure_propagates_through_the_typed_surface() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/books/"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"detail": "duplicate"})))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("sekrit", "meg").unwrap();

    let book = shelfdesk_core::models::NewBook {
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        quantity: 1,
    };
    let err = h.client.create_book(&book).await.unwrap_err();

    match err {
        ApiError::Rejected(message) => assert_eq!(message, "duplicate"),
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert_eq!(h.notifier.toasts().len(), 1);
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("sekrit", "meg").unwrap();

    let outcome = h
        .client
        .request(RequestDescriptor::new(Method::GET, "/books/"))
        .await;
    assert_eq!(outcome, Outcome::Failure("An error occurred".to_string()));
    assert_eq!(h.notifier.toasts().len(), 1);
}

#[tokio::test]
async fn transport_failure_is_surfaced_like_an_application_failure() {
    // Grab a port that was listening a moment ago, then drop the server
    // so the connection is refused.
    let server = MockServer::start().await;
    let dead_uri = server.uri();
    drop(server);

    let h = harness(&dead_uri);
    h.tokens.store("sekrit", "meg").unwrap();

    let outcome = h
        .client
        .request(RequestDescriptor::new(Method::GET, "/books/"))
        .await;

    match outcome {
        Outcome::Failure(message) => assert!(message.starts_with("Network error")),
        other => panic!("expected Failure, got {:?}", other),
    }
    assert_eq!(h.notifier.toasts().len(), 1);
    assert_eq!(h.navigator.login_requests(), 0);
}

#[tokio::test]
async fn login_rejection_does_not_touch_session_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect username or password."})),
        )
        .mount(&server)
        .await;

    let h = harness(&server.uri());

    let err = h.client.login("meg", "wrong").await.unwrap_err();

    match err {
        ApiError::Rejected(message) => assert_eq!(message, "Incorrect username or password."),
        other => panic!("expected Rejected, got {:?}", other),
    }
    // A login 401 is not a session expiry: no redirect, no toast
    assert_eq!(h.navigator.login_requests(), 0);
    assert!(h.notifier.toasts().is_empty());
    assert_eq!(h.tokens.get(), None);
}

#[tokio::test]
async fn login_success_returns_the_issued_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-123", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let token = h.client.login("meg", "hunter2").await.unwrap();

    assert_eq!(token.access_token, "tok-123");
    assert_eq!(token.token_type, "bearer");
}

#[tokio::test]
async fn profile_comes_back_from_the_identity_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer sekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 1, "username": "meg", "email": "meg@example.com", "is_active": true}),
        ))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("sekrit", "meg").unwrap();

    let profile = h.client.me().await.unwrap();
    assert_eq!(profile.username, "meg");
    assert!(profile.is_active);
}

#[tokio::test]
async fn book_updates_send_only_the_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/books/3"))
        .and(body_json(json!({"quantity": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 3, "title": "Dune", "author": "Herbert", "quantity": 4}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("sekrit", "meg").unwrap();

    let updates = shelfdesk_core::models::BookUpdate {
        quantity: Some(4),
        ..Default::default()
    };
    let book = h.client.update_book(3, &updates).await.unwrap();
    assert_eq!(book.quantity, 4);
}

#[tokio::test]
async fn created_resources_decode_from_201_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/members/"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 5, "name": "Arthur"})),
        )
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.tokens.store("sekrit", "meg").unwrap();

    let member = h
        .client
        .register_member(&shelfdesk_core::models::NewMember {
            name: "Arthur".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(member.id, 5);
    assert_eq!(member.name, "Arthur");
    assert!(h.notifier.toasts().is_empty());
}
