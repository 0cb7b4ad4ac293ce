use eduassist_core::EduError;
use eduassist_core::backend::{AssistantBackend, ComplianceRequest, RecordRequest};
use eduassist_core::config::ClientConfig;
use eduassist_core::notify::RecordingNotifier;
use eduassist_core::routes::{AuthState, Navigator};
use eduassist_core::session_store::InMemorySessionStore;
use eduassist_interaction::{ApiClient, AuthGuard, AuthScope, HttpAssistantBackend};
use std::sync::Arc;

struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect(&self, _path: &str) {}
}

fn backend() -> HttpAssistantBackend {
    let guard = AuthGuard::new(
        AuthScope::Teacher,
        Arc::new(InMemorySessionStore::new()),
        Arc::new(NoopNavigator),
        Arc::new(RecordingNotifier::new()),
        Arc::new(AuthState::new()),
    );
    // nothing listens here; the disabled calls must not touch the network
    HttpAssistantBackend::new(ApiClient::new(
        ClientConfig::new("http://127.0.0.1:9"),
        Arc::new(guard),
    ))
}

#[tokio::test]
async fn compliance_reports_are_disabled() {
    let result = backend()
        .generate_compliance_report(&ComplianceRequest {
            report_type: "attendance".into(),
            period: "Q1".into(),
            notes: None,
        })
        .await;
    assert!(matches!(result, Err(EduError::FeatureDisabled(_))));
}

#[tokio::test]
async fn record_creation_is_disabled() {
    let result = backend()
        .create_record(&RecordRequest {
            record_type: "behavior".into(),
            student: "Ana".into(),
            details: "Helped a classmate".into(),
        })
        .await;
    assert!(matches!(result, Err(EduError::FeatureDisabled(_))));
}
