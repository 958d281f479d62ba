use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};

use async_trait::async_trait;
use tokio::sync::Notify;

use movie_actions::{
    ActionError, ClientOptions, Delivery, MemoryPage, MovieActionClient, MovieId,
    client::{
        actions::{DispatchMode, Endpoints, NavigatePolicy, NavigationKind},
        request::{HttpMethod, MovieRequest, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE},
        transport::{RecordingTransport, Transport, TransportResponse},
    },
    page::page_model::Navigation,
    trace::{
        logger::ActionJournal,
        trace::{ActionEvent, ActionEventKind},
    },
};

fn recording_client(options: ClientOptions) -> MovieActionClient<RecordingTransport> {
    MovieActionClient::new(RecordingTransport::new(), options)
}

fn scripted_client(
    transport: RecordingTransport,
    options: ClientOptions,
) -> MovieActionClient<RecordingTransport> {
    MovieActionClient::new(transport, options)
}

// =========================================================================
// Wire shape
// =========================================================================

#[tokio::test]
async fn delete_sends_one_json_delete_then_reloads() {
    let client = recording_client(ClientOptions::default());
    let mut page = MemoryPage::new("/movies");

    let outcome = client.delete_movie(&mut page, "Inception").await.unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Delete);
    assert_eq!(requests[0].path, "/movies/delete");
    assert_eq!(requests[0].content_type, "application/json;charset=UTF-8");
    assert_eq!(requests[0].body, r#"{"movie":"Inception"}"#);

    assert_eq!(outcome.delivery, Delivery::Confirmed(200));
    assert_eq!(page.history, vec![Navigation::Reload]);
    assert!(page.alerts.is_empty());
}

#[tokio::test]
async fn update_sends_one_json_put() {
    let client = recording_client(ClientOptions::default());
    let mut page = MemoryPage::new("/movies");

    client.update_movie(&mut page, "Inception").await.unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Put);
    assert_eq!(requests[0].path, "/movies/edit");
    assert_eq!(requests[0].content_type, JSON_CONTENT_TYPE);
    assert_eq!(requests[0].body, r#"{"movie":"Inception"}"#);
    assert_eq!(page.last_navigation(), Some(&Navigation::Reload));
}

#[tokio::test]
async fn add_posts_the_form_and_redirects_to_listing() {
    let client = recording_client(ClientOptions {
        navigation: NavigationKind::Redirect,
        ..ClientOptions::default()
    });
    let mut page = MemoryPage::new("/movies");

    client.add_movie(&mut page, "The Thing").await.unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].path, "/movies/add");
    assert_eq!(requests[0].content_type, FORM_CONTENT_TYPE);
    assert_eq!(requests[0].body, "movie=The+Thing");
    assert_eq!(page.history, vec![Navigation::Redirect("/movies".into())]);
}

#[tokio::test]
async fn identifier_with_quotes_stays_valid_json() {
    let client = recording_client(ClientOptions::default());
    let mut page = MemoryPage::new("/movies");

    client
        .delete_movie(&mut page, r#"The "Best" Movie"#)
        .await
        .unwrap();

    let body = &client.transport().requests()[0].body;
    assert_eq!(body, r#"{"movie":"The \"Best\" Movie"}"#);
    let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(parsed["movie"], r#"The "Best" Movie"#);
}

#[tokio::test]
async fn numeric_identifier_is_passed_through() {
    let client = recording_client(ClientOptions::default());
    let mut page = MemoryPage::new("/movies");

    client.update_movie(&mut page, MovieId::from(7)).await.unwrap();

    assert_eq!(client.transport().requests()[0].body, r#"{"movie":7}"#);
}

#[tokio::test]
async fn custom_endpoints_are_used() {
    let client = recording_client(ClientOptions {
        endpoints: Endpoints {
            delete: "/v2/movies/remove".into(),
            edit: "/v2/movies/modify".into(),
            add: "/v2/movies/new".into(),
            listing: "/v2/movies".into(),
        },
        navigation: NavigationKind::Redirect,
        ..ClientOptions::default()
    });
    let mut page = MemoryPage::new("/v2/movies");

    client.delete_movie(&mut page, "Heat").await.unwrap();
    client.update_movie(&mut page, "Heat").await.unwrap();

    let paths: Vec<String> = client
        .transport()
        .requests()
        .into_iter()
        .map(|r| r.path)
        .collect();
    assert_eq!(paths, vec!["/v2/movies/remove", "/v2/movies/modify"]);
    assert_eq!(page.url, "/v2/movies");
}

// =========================================================================
// Confirmation
// =========================================================================

#[tokio::test]
async fn confirmation_is_shown_before_navigation() {
    let client = recording_client(ClientOptions {
        confirm: true,
        ..ClientOptions::default()
    });
    let mut page = MemoryPage::new("/movies");

    client.update_movie(&mut page, "Inception").await.unwrap();
    client.delete_movie(&mut page, "Alien").await.unwrap();

    assert_eq!(page.alerts, vec!["Inception updated", "Alien deleted"]);
    assert_eq!(page.history.len(), 2);
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn rejected_request_does_not_navigate_by_default() {
    let client = scripted_client(
        RecordingTransport::new().respond_with(500),
        ClientOptions {
            confirm: true,
            ..ClientOptions::default()
        },
    );
    let mut page = MemoryPage::new("/movies");

    let err = client.delete_movie(&mut page, "Inception").await.unwrap_err();

    assert!(matches!(err, ActionError::RequestRejected { status: 500, .. }));
    assert!(page.history.is_empty());
    assert_eq!(page.alerts.len(), 1);
    assert!(page.alerts[0].starts_with("Inception could not be deleted"));
}

#[tokio::test]
async fn transport_failure_is_surfaced() {
    let client = scripted_client(
        RecordingTransport::new().fail_with("connection refused"),
        ClientOptions::default(),
    );
    let mut page = MemoryPage::new("/movies");

    let err = client.update_movie(&mut page, "Heat").await.unwrap_err();

    match err {
        ActionError::Transport { method, path, message } => {
            assert_eq!(method, "PUT");
            assert_eq!(path, "/movies/edit");
            assert_eq!(message, "connection refused");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(page.history.is_empty());
}

#[tokio::test]
async fn always_policy_navigates_despite_failure() {
    let client = scripted_client(
        RecordingTransport::new().respond_with(404),
        ClientOptions {
            navigate: NavigatePolicy::Always,
            ..ClientOptions::default()
        },
    );
    let mut page = MemoryPage::new("/movies");

    let outcome = client.delete_movie(&mut page, "Inception").await.unwrap();

    assert!(matches!(outcome.delivery, Delivery::Failed(ref reason) if reason.contains("404")));
    assert_eq!(page.history, vec![Navigation::Reload]);
}

#[tokio::test]
async fn always_policy_confirms_and_navigates_after_transport_failure() {
    let client = scripted_client(
        RecordingTransport::new().fail_with("connection reset"),
        ClientOptions {
            navigate: NavigatePolicy::Always,
            confirm: true,
            ..ClientOptions::default()
        },
    );
    let mut page = MemoryPage::new("/movies");

    let outcome = client.delete_movie(&mut page, "Inception").await.unwrap();

    match &outcome.delivery {
        Delivery::Failed(reason) => assert!(reason.contains("connection reset")),
        other => panic!("unexpected delivery: {other:?}"),
    }
    assert_eq!(page.alerts, vec!["Inception deleted"]);
    assert_eq!(page.history, vec![Navigation::Reload]);
}

#[tokio::test]
async fn failed_request_is_not_retried() {
    let client = scripted_client(
        RecordingTransport::new().respond_with(503),
        ClientOptions::default(),
    );
    let mut page = MemoryPage::new("/movies");

    let _ = client.delete_movie(&mut page, "Inception").await;

    assert_eq!(client.transport().requests().len(), 1);
}

// =========================================================================
// Detached dispatch
// =========================================================================

/// Holds every request until the test releases it.
struct GatedTransport {
    gate: Arc<Notify>,
    responded: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for GatedTransport {
    async fn send(&self, _request: &MovieRequest) -> Result<TransportResponse, ActionError> {
        self.gate.notified().await;
        self.responded.store(true, Ordering::SeqCst);
        Ok(TransportResponse { status: 200 })
    }
}

#[tokio::test]
async fn detached_dispatch_navigates_before_the_response() {
    let gate = Arc::new(Notify::new());
    let responded = Arc::new(AtomicBool::new(false));
    let client = MovieActionClient::new(
        GatedTransport {
            gate: Arc::clone(&gate),
            responded: Arc::clone(&responded),
        },
        ClientOptions {
            dispatch: DispatchMode::Detached,
            confirm: true,
            ..ClientOptions::default()
        },
    );
    let mut page = MemoryPage::new("/movies");

    let mut outcome = client.delete_movie(&mut page, "Inception").await.unwrap();

    assert_eq!(outcome.delivery, Delivery::Detached);
    assert_eq!(page.history, vec![Navigation::Reload]);
    assert_eq!(page.alerts, vec!["Inception deleted"]);
    assert!(!responded.load(Ordering::SeqCst));

    gate.notify_one();
    outcome.pending.take().unwrap().await.unwrap();
    assert!(responded.load(Ordering::SeqCst));
}

#[tokio::test]
async fn detached_dispatch_navigates_even_if_request_fails() {
    let client = scripted_client(
        RecordingTransport::new().respond_with(500),
        ClientOptions {
            dispatch: DispatchMode::Detached,
            ..ClientOptions::default()
        },
    );
    let mut page = MemoryPage::new("/movies");

    let mut outcome = client.update_movie(&mut page, "Heat").await.unwrap();
    outcome.pending.take().unwrap().await.unwrap();

    assert_eq!(outcome.delivery, Delivery::Detached);
    assert_eq!(page.history, vec![Navigation::Reload]);
    assert_eq!(client.transport().requests().len(), 1);
}

#[test]
fn detached_dispatch_outside_a_runtime_is_an_error() {
    let client = recording_client(ClientOptions {
        dispatch: DispatchMode::Detached,
        ..ClientOptions::default()
    });
    let mut page = MemoryPage::new("/movies");

    // The detached branch never awaits, so a single poll settles it.
    let result = {
        let mut action = pin!(client.delete_movie(&mut page, "Inception"));
        let mut cx = Context::from_waker(Waker::noop());
        match action.as_mut().poll(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => panic!("detached dispatch should not suspend"),
        }
    };

    let err = result.unwrap_err();
    assert!(err.is_request_failure());
    assert!(err.to_string().contains("no async runtime"));
    assert!(page.history.is_empty());
    assert!(client.transport().requests().is_empty());
}

// =========================================================================
// Journal
// =========================================================================

#[tokio::test]
async fn journal_records_dispatch_response_and_navigation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actions.jsonl");
    let client =
        recording_client(ClientOptions::default()).with_journal(ActionJournal::new(&path));
    let mut page = MemoryPage::new("/movies");

    client.delete_movie(&mut page, "Inception").await.unwrap();

    let events: Vec<serde_json::Value> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let kinds: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["dispatched", "responded", "navigated"]);
    assert_eq!(events[0]["method"], "DELETE");
    assert_eq!(events[0]["body"], r#"{"movie":"Inception"}"#);
    assert_eq!(events[0]["movie"], "Inception");
    assert_eq!(events[0]["action"], "delete");
    assert_eq!(events[1]["status"], 200);
}

#[tokio::test]
async fn journal_records_detached_failure_after_navigation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actions.jsonl");
    let client = scripted_client(
        RecordingTransport::new().respond_with(500),
        ClientOptions {
            dispatch: DispatchMode::Detached,
            ..ClientOptions::default()
        },
    )
    .with_journal(ActionJournal::new(&path));
    let mut page = MemoryPage::new("/movies");

    let mut outcome = client.delete_movie(&mut page, "Inception").await.unwrap();
    outcome.pending.take().unwrap().await.unwrap();

    let events: Vec<serde_json::Value> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let kinds: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["dispatched", "navigated", "failed"]);
    assert_eq!(events[0]["detached"], true);
    assert!(events[2]["reason"].as_str().unwrap().contains("500"));
    assert_eq!(events[2]["movie"], "Inception");
}

#[test]
fn journal_writes_one_json_object_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actions.jsonl");
    let journal = ActionJournal::new(&path);
    assert!(journal.is_enabled());

    journal.log(&ActionEvent::now(ActionEventKind::Responded { status: 204 }));
    journal.log(&ActionEvent::now(ActionEventKind::Navigated {
        navigation: Navigation::Reload,
    }));

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["event"], "responded");
    assert_eq!(first["status"], 204);
    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["navigation"]["kind"], "reload");
}

#[test]
fn unopenable_path_disables_journal() {
    let dir = tempfile::tempdir().unwrap();
    let journal = ActionJournal::new(&dir.path().join("missing").join("actions.jsonl"));

    assert!(!journal.is_enabled());
    journal.log(&ActionEvent::now(ActionEventKind::Responded { status: 200 }));
    assert!(!ActionJournal::disabled().is_enabled());
}
