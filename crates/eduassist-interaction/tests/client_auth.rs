//! End-to-end checks of the response policy against a throwaway HTTP server.

use eduassist_core::config::ClientConfig;
use eduassist_core::notify::{NoticeLevel, RecordingNotifier};
use eduassist_core::routes::{AuthState, Navigator};
use eduassist_core::session_store::{InMemorySessionStore, SessionStore, StorageKey};
use eduassist_interaction::endpoints::LoginRequest;
use eduassist_interaction::{ApiClient, ApiError, AuthGuard, AuthScope};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Default)]
struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

/// Serves one canned response per accepted connection and returns the raw
/// request heads it saw.
async fn serve(responses: Vec<(u16, &'static str, String)>) -> (String, tokio::task::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, reason, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            seen.push(request);
            let reply = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        seen
    });
    (base, handle)
}

/// Reads the head plus a `Content-Length` body so the socket is drained
/// before the reply goes out.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = vec![0u8; 16 * 1024];
    let mut request = Vec::new();
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        request.extend_from_slice(&buf[..n]);
        if n == 0 {
            break;
        }
        let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&request[..head_end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if request.len() >= head_end + 4 + body_len {
            break;
        }
    }
    String::from_utf8_lossy(&request).to_string()
}

struct Harness {
    client: ApiClient,
    store: Arc<InMemorySessionStore>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
    auth_state: Arc<AuthState>,
}

fn harness(base: &str, scope: AuthScope) -> Harness {
    let store = Arc::new(InMemorySessionStore::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::new());
    let auth_state = Arc::new(AuthState::new());
    let guard = AuthGuard::new(
        scope,
        store.clone(),
        navigator.clone(),
        notifier.clone(),
        auth_state.clone(),
    );
    Harness {
        client: ApiClient::new(ClientConfig::new(base), Arc::new(guard)),
        store,
        navigator,
        notifier,
        auth_state,
    }
}

#[tokio::test]
async fn expired_session_clears_token_and_redirects_once() {
    let (base, server) = serve(vec![(
        401,
        "Unauthorized",
        json!({"detail": "Could not validate credentials"}).to_string(),
    )])
    .await;
    let h = harness(&base, AuthScope::Teacher);
    h.store.set(StorageKey::Token, json!("stale-token")).unwrap();
    h.auth_state.set_authenticated(true);

    let err = h.client.performance_overview().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(h.store.get(StorageKey::Token).unwrap(), None);
    assert!(!h.auth_state.is_flagged());
    assert_eq!(*h.navigator.paths.lock().unwrap(), vec!["/login".to_string()]);
    assert!(h.notifier.notices().is_empty());

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /api/v1/performance/overview"));
    assert!(
        requests[0]
            .to_ascii_lowercase()
            .contains("authorization: bearer stale-token")
    );
}

#[tokio::test]
async fn failed_login_keeps_session_and_returns_message() {
    let (base, server) = serve(vec![(
        401,
        "Unauthorized",
        json!({"detail": "Incorrect email or password"}).to_string(),
    )])
    .await;
    let h = harness(&base, AuthScope::Teacher);
    h.store.set(StorageKey::Token, json!("existing")).unwrap();

    let err = h
        .client
        .educator_login(&LoginRequest {
            email: "t@school.edu".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Unauthorized {
            message: "Incorrect email or password".into()
        }
    );
    assert_eq!(h.store.get(StorageKey::Token).unwrap(), Some(json!("existing")));
    assert!(h.navigator.paths.lock().unwrap().is_empty());

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /api/v1/educators/login"));
    assert!(!requests[0].to_ascii_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn validation_detail_is_notified_verbatim() {
    let (base, server) = serve(vec![(
        422,
        "Unprocessable Entity",
        json!({"detail": [{"loc": ["body", "subject"], "msg": "field required"}]}).to_string(),
    )])
    .await;
    let h = harness(&base, AuthScope::Teacher);

    let err = h
        .client
        .bulk_send(&eduassist_interaction::endpoints::BulkSendRequest {
            recipient_ids: vec!["1".into()],
            subject: String::new(),
            message: "hi".into(),
            template_id: None,
            include_parents: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation { status: 422, .. }));
    assert_eq!(
        h.notifier.notices(),
        vec![(NoticeLevel::Error, "subject: field required".to_string())]
    );
    assert!(h.navigator.paths.lock().unwrap().is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn student_client_uses_student_token() {
    let (base, server) = serve(vec![(200, "OK", json!({"marks": []}).to_string())]).await;
    let h = harness(&base, AuthScope::Student);
    h.store.set(StorageKey::Token, json!("teacher-token")).unwrap();
    h.store.set(StorageKey::StudentToken, json!("student-token")).unwrap();

    let marks = h.client.student_marks().await.unwrap();
    assert_eq!(marks, json!({"marks": []}));

    let requests = server.await.unwrap();
    let head = requests[0].to_ascii_lowercase();
    assert!(head.contains("authorization: bearer student-token"));
    assert!(!head.contains("teacher-token"));
}

#[tokio::test]
async fn unreachable_backend_reports_network_error() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let h = harness(&base, AuthScope::Teacher);
    let err = h.client.sections().await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(
        h.notifier.notices(),
        vec![(NoticeLevel::Error, "Network error".to_string())]
    );
}
