// End-to-end flow against a mock backend: log in, request a report,
// watch it move from processing to completed, and restore the session
// from the on-disk files the way a fresh process start would.

use httptest::{
    matchers::request,
    responders::{cycle, json_encoded},
    Expectation, Server,
};
use reqwest::{Client as ReqwestClient, Url};
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

use medthing_cli::client::{HttpClient, ReqwestClientWrapper};
use medthing_cli::session::{CliNavigator, SessionStore, DASHBOARD_ROUTE};
use medthing_cli::storage::{
    CookieSink, FileCookieSink, FileStorage, SessionStorage, TOKEN_KEY, USER_KEY,
};
use medthing_cli::test_support::RecordingNotifier;

const DOCTOR_ID: &str = "6f1c2a4e-0db1-4f0f-9d5c-6a9be29e4f01";
const PATIENT_ID: &str = "8c5f4a88-5aa1-4c32-9e54-0cf2a1cd3f11";
const REPORT_ID: &str = "3b2f7c10-92c4-4b5e-8f27-4f8f5b2f6a42";

fn doctor_json() -> serde_json::Value {
    json!({
        "id": DOCTOR_ID,
        "email": "doc@example.com",
        "name": "Dr. X",
        "specialization": "Cardiology",
        "licenseNumber": "LIC-1"
    })
}

#[tokio::test]
async fn report_generation_flow_with_persistent_session() {
    let server = Server::run();
    let base_url = Url::parse(&server.url_str("")).unwrap();

    let dir = tempdir().unwrap();
    let storage_path = dir.path().join("session.json");
    let cookie_path = dir.path().join("cookies.txt");

    let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::open(storage_path.clone()));
    let cookies: Arc<dyn CookieSink> = Arc::new(FileCookieSink::new(cookie_path.clone()));
    let navigator = Arc::new(CliNavigator::new());
    let notifier = Arc::new(RecordingNotifier::default());

    let session = Arc::new(SessionStore::restore(
        storage,
        cookies,
        navigator.clone(),
        notifier.clone(),
    ));
    let client = ReqwestClientWrapper::new(
        ReqwestClient::new(),
        base_url,
        session.clone(),
        notifier,
    );

    // Login persists the session to disk and routes to the dashboard.
    server.expect(
        Expectation::matching(request::method_path("POST", "/api/auth/login")).respond_with(
            json_encoded(json!({
                "success": true,
                "message": "Login successful",
                "data": { "token": "abc", "user": doctor_json() }
            })),
        ),
    );
    session
        .login(
            &client,
            "doc@example.com",
            SecretString::new("secret123".to_string().into_boxed_str()),
        )
        .await
        .unwrap();
    assert!(session.is_authenticated());
    assert_eq!(navigator.current_route(), DASHBOARD_ROUTE);

    // Kick off generation; the backend answers with just the report id.
    server.expect(
        Expectation::matching(request::method_path("POST", "/api/reports/generate"))
            .respond_with(json_encoded(json!({
                "success": true,
                "message": "Report generation started",
                "data": { "id": REPORT_ID }
            }))),
    );
    let patient_id = uuid::Uuid::parse_str(PATIENT_ID).unwrap();
    let report_id = client.generate_report(patient_id).await.unwrap();
    assert_eq!(report_id.to_string(), REPORT_ID);

    // Two polls: still processing first, then completed with content.
    let processing_body = json!({
        "success": true,
        "message": "Report retrieved successfully",
        "data": {
            "id": REPORT_ID,
            "patientId": PATIENT_ID,
            "patientName": "Jane Roe",
            "reportType": "Comprehensive Health Assessment",
            "summary": "",
            "sections": null,
            "recommendations": null,
            "generatedAt": "2025-05-01T10:00:00Z",
            "status": "processing"
        }
    });
    let completed_body = json!({
        "success": true,
        "message": "Report retrieved successfully",
        "data": {
            "id": REPORT_ID,
            "patientId": PATIENT_ID,
            "patientName": "Jane Roe",
            "patientInfo": { "age": 41, "gender": "female", "dateOfBirth": "1984-02-29" },
            "reportType": "Comprehensive Health Assessment",
            "summary": "Overall health is stable.",
            "sections": [
                { "title": "Vitals", "content": "<p>Blood pressure trending normal.</p>" }
            ],
            "recommendations": ["Continue current medication."],
            "generatedAt": "2025-05-01T10:00:00Z",
            "status": "completed"
        }
    });
    server.expect(
        Expectation::matching(request::method_path(
            "GET",
            "/api/reports/3b2f7c10-92c4-4b5e-8f27-4f8f5b2f6a42",
        ))
        .times(2)
        .respond_with(cycle(vec![
            Box::new(json_encoded(processing_body)),
            Box::new(json_encoded(completed_body)),
        ])),
    );

    let pending = client.get_report(report_id).await.unwrap();
    assert_eq!(pending.status, "processing");
    assert!(pending.sections.unwrap_or_default().is_empty());

    let completed = client.get_report(report_id).await.unwrap();
    assert_eq!(completed.status, "completed");
    assert_eq!(completed.summary, "Overall health is stable.");
    assert_eq!(completed.sections.unwrap_or_default().len(), 1);
    assert_eq!(
        completed.recommendations.unwrap_or_default(),
        vec!["Continue current medication.".to_string()]
    );

    // The report shows up in the list endpoint (a bare array).
    server.expect(
        Expectation::matching(request::method_path("GET", "/api/reports")).respond_with(
            json_encoded(json!([{
                "id": REPORT_ID,
                "patientId": PATIENT_ID,
                "patientName": "Jane Roe",
                "reportType": "Comprehensive Health Assessment",
                "generatedAt": "2025-05-01T10:00:00Z",
                "status": "completed"
            }])),
        ),
    );
    let reports = client.list_reports().await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, report_id);

    // A fresh store over the same files hydrates straight into the
    // authenticated state, exactly like a process restart.
    let restored = SessionStore::restore(
        Arc::new(FileStorage::open(storage_path)),
        Arc::new(FileCookieSink::new(cookie_path)),
        Arc::new(CliNavigator::new()),
        Arc::new(RecordingNotifier::default()),
    );
    assert!(restored.is_authenticated());
    assert_eq!(restored.token().as_deref(), Some("abc"));
    assert_eq!(restored.current_user().unwrap().email, "doc@example.com");
}

#[tokio::test]
async fn logout_removes_session_files() {
    let dir = tempdir().unwrap();
    let storage_path = dir.path().join("session.json");
    let cookie_path = dir.path().join("cookies.txt");

    let storage: Arc<FileStorage> = Arc::new(FileStorage::open(storage_path.clone()));
    storage.set(TOKEN_KEY, "abc");
    storage.set(USER_KEY, &doctor_json().to_string());
    let cookies: Arc<FileCookieSink> = Arc::new(FileCookieSink::new(cookie_path.clone()));
    cookies.set_token("abc");

    let session = SessionStore::restore(
        storage.clone(),
        cookies.clone(),
        Arc::new(CliNavigator::new()),
        Arc::new(RecordingNotifier::default()),
    );
    assert!(session.is_authenticated());

    session.logout();
    assert!(!session.is_authenticated());
    assert!(storage.get(TOKEN_KEY).is_none());
    assert!(storage.get(USER_KEY).is_none());
    assert!(cookies.token().is_none());
    assert!(!cookie_path.exists());
}
