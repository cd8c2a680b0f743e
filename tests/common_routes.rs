mod support;

use axum::http::StatusCode;
use support::TestApp;

#[tokio::test]
async fn health_and_ready_report_ok() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn version_names_the_package() {
    let app = TestApp::new();
    let (status, body) = app.get("/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "chore-tracker");
}
