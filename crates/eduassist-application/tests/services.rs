//! Service behaviour that only touches the session store.

use chrono::{Duration, Utc};
use eduassist_application::AppContext;
use eduassist_core::config::ClientConfig;
use eduassist_core::conversation::{ChatMessage, ChatTranscript, HISTORY_LIMIT};
use eduassist_core::notify::RecordingNotifier;
use eduassist_core::routes::{Navigator, Route, RouteDecision};
use eduassist_core::session_store::{InMemorySessionStore, SessionStore, SessionStoreExt, StorageKey};
use serde_json::json;
use std::sync::Arc;

struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect(&self, _path: &str) {}
}

fn context() -> (AppContext, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let ctx = AppContext::new(
        ClientConfig::new("http://127.0.0.1:9"),
        store.clone(),
        Arc::new(NoopNavigator),
        Arc::new(RecordingNotifier::new()),
    );
    (ctx, store)
}

#[test]
fn logout_clears_token_and_locks_dashboard() {
    let (ctx, store) = context();
    store.set(StorageKey::Token, json!("t")).unwrap();
    let auth = ctx.auth();
    assert!(auth.is_authenticated().unwrap());
    assert_eq!(
        auth.resolve_route("/dashboard").unwrap(),
        RouteDecision::Render(Route::TeacherDashboard)
    );

    auth.logout().unwrap();

    assert!(!auth.is_authenticated().unwrap());
    assert_eq!(
        auth.resolve_route("/dashboard").unwrap(),
        RouteDecision::Redirect("/login".into())
    );
}

#[test]
fn preselected_users_are_handed_off_once() {
    let (ctx, _) = context();
    let dashboard = ctx.dashboard();
    dashboard
        .preselect_users(&[json!({"id": 3, "name": "Ana"}), json!({"id": 4, "name": "Ben"})])
        .unwrap();

    let users = dashboard.take_preselected_users().unwrap();
    assert_eq!(users.len(), 2);
    assert!(dashboard.take_preselected_users().unwrap().is_empty());
}

#[test]
fn selected_section_is_remembered() {
    let (ctx, store) = context();
    ctx.dashboard().select_section("7B").unwrap();
    assert_eq!(ctx.dashboard().selected_section().unwrap().as_deref(), Some("7B"));
    assert_eq!(store.get(StorageKey::SelectedSectionId).unwrap(), Some(json!("7B")));
}

#[test]
fn student_session_lives_under_student_keys() {
    let (ctx, store) = context();
    let portal = ctx.student_portal();
    assert!(!portal.is_signed_in().unwrap());
    assert_eq!(portal.current_student().unwrap(), None);

    store.set(StorageKey::StudentToken, json!("s")).unwrap();
    store.set(StorageKey::StudentData, json!({"name": "Ana"})).unwrap();
    store.set(StorageKey::Token, json!("teacher")).unwrap();
    assert!(portal.is_signed_in().unwrap());
    assert_eq!(portal.current_student().unwrap(), Some(json!({"name": "Ana"})));

    portal.logout().unwrap();
    assert!(!portal.is_signed_in().unwrap());
    assert_eq!(store.get_string(StorageKey::Token).unwrap().as_deref(), Some("teacher"));
}

#[tokio::test]
async fn enhanced_history_expires_after_an_hour() {
    let (ctx, store) = context();
    let saved_at = Utc::now() - Duration::hours(2);
    let mut transcript = ChatTranscript::default();
    transcript.push(ChatMessage::user("old question", saved_at));
    transcript.touch(saved_at);
    store.set_json(StorageKey::EducatorAiChat, &transcript).unwrap();

    assert!(ctx.enhanced_assistant().messages().await.is_empty());

    transcript.touch(Utc::now() - Duration::minutes(5));
    store.set_json(StorageKey::EducatorAiChat, &transcript).unwrap();
    assert_eq!(ctx.enhanced_assistant().messages().await.len(), 1);
}

#[tokio::test]
async fn simple_chat_history_is_loaded_and_cleared() {
    let (ctx, store) = context();
    let history = vec![
        ChatMessage::user("hi", Utc::now()),
        ChatMessage::assistant("hello!", Utc::now()),
    ];
    store.set_json(StorageKey::SimpleChatbotHistory, &history).unwrap();

    let chat = ctx.simple_chat();
    assert_eq!(chat.history().await, history);

    chat.clear().await.unwrap();
    assert!(chat.history().await.is_empty());
    assert_eq!(store.get(StorageKey::SimpleChatbotHistory).unwrap(), None);
}

#[tokio::test]
async fn failed_chat_turns_leave_history_untouched() {
    let (ctx, store) = context();
    let previous = vec![ChatMessage::user("hi", Utc::now())];
    store.set_json(StorageKey::SimpleChatbotHistory, &previous).unwrap();

    let enhanced = ctx.enhanced_assistant();
    assert!(enhanced.send("who is at risk?", Utc::now()).await.is_err());
    assert!(enhanced.messages().await.is_empty());
    assert_eq!(store.get(StorageKey::EducatorAiChat).unwrap(), None);

    let chat = ctx.simple_chat();
    assert!(chat.send("hello again", Utc::now()).await.is_err());
    assert_eq!(chat.history().await, previous);
}

#[tokio::test]
async fn simple_chat_history_is_capped_on_load() {
    let (ctx, store) = context();
    let history: Vec<ChatMessage> = (0..HISTORY_LIMIT + 3)
        .map(|i| ChatMessage::user(format!("m{i}"), Utc::now()))
        .collect();
    store.set_json(StorageKey::SimpleChatbotHistory, &history).unwrap();

    let loaded = ctx.simple_chat().history().await;
    assert_eq!(loaded.len(), HISTORY_LIMIT);
    assert_eq!(loaded[0].content, "m3");
}

#[test]
fn bootstrap_uses_files_under_base_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let paths = eduassist_infrastructure::EduPaths::new(Some(dir.path()));
    let ctx = AppContext::bootstrap(
        &paths,
        Arc::new(NoopNavigator),
        Arc::new(RecordingNotifier::new()),
    )
    .unwrap();

    ctx.store().set(StorageKey::Token, json!("persisted")).unwrap();
    assert!(paths.session_file().unwrap().exists());
}
