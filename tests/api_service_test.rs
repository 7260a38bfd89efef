//! Integration tests for the background API worker
//!
//! Requests go in over a channel, responses come back tagged with what they
//! answer. Session expiry travels as an ordinary error value.

mod common;

use std::time::Duration;

use common::{client_with, json, path_of, ScriptedTransport};
use noticetui::error::ApiError;
use noticetui::logic::errors::requires_login;
use noticetui::services::{spawn_api_service, ApiRequest, ApiResponse};
use noticetui::session::Session;
use serde_json::json;
use tokio::time::timeout;

async fn next_response(rx: &mut tokio::sync::mpsc::UnboundedReceiver<ApiResponse>) -> ApiResponse {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("worker answered in time")
        .expect("worker alive")
}

#[tokio::test]
async fn test_worker_answers_list_request() {
    let (client, _, _) = client_with(
        ScriptedTransport::new(|req| match path_of(&req.url) {
            "/api/notices" => json(200, json!([{ "id": "n1", "title": "Library hours" }])),
            _ => json(404, json!({ "error": "not found" })),
        }),
        Some(Session::new("tok", None)),
    );
    let (tx, mut rx) = spawn_api_service(client);

    tx.send(ApiRequest::ListNotices).unwrap();
    match next_response(&mut rx).await {
        ApiResponse::NoticesResult(Ok(notices)) => {
            assert_eq!(notices.len(), 1);
            assert_eq!(notices[0].title, "Library hours");
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[tokio::test]
async fn test_worker_reports_session_expiry() {
    let (client, _, store) = client_with(
        ScriptedTransport::new(|_| json(401, json!({ "message": "Token has expired!" }))),
        Some(Session::new("stale", None)),
    );
    let (tx, mut rx) = spawn_api_service(client);

    tx.send(ApiRequest::GetUsersCount).unwrap();
    let response = next_response(&mut rx).await;
    let err = response.error().expect("an error");
    assert_eq!(*err, ApiError::SessionExpired);
    assert!(requires_login(err));
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_worker_tags_responses_with_notice_id() {
    let (client, _, _) = client_with(
        ScriptedTransport::new(|req| match path_of(&req.url) {
            "/api/notices/n1" => json(200, json!({ "id": "n1", "title": "One" })),
            "/api/notices/n2" => json(404, json!({ "error": "Notice not found" })),
            _ => json(404, json!({ "error": "not found" })),
        }),
        Some(Session::new("tok", None)),
    );
    let (tx, mut rx) = spawn_api_service(client);

    tx.send(ApiRequest::GetNotice { id: "n1".into() }).unwrap();
    tx.send(ApiRequest::GetNotice { id: "n2".into() }).unwrap();

    let mut seen = Vec::new();
    for _ in 0..2 {
        match next_response(&mut rx).await {
            ApiResponse::NoticeResult { id, notice } => seen.push((id, notice.is_ok())),
            other => panic!("unexpected response: {:?}", other),
        }
    }
    seen.sort();
    assert_eq!(
        seen,
        vec![("n1".to_string(), true), ("n2".to_string(), false)]
    );
}

#[tokio::test]
async fn test_logout_through_worker_clears_store() {
    let (client, transport, store) = client_with(
        ScriptedTransport::new(|_| json(200, json!({ "message": "Logged out" }))),
        Some(Session::new("tok", Some("r1".to_string()))),
    );
    let (tx, mut rx) = spawn_api_service(client);

    tx.send(ApiRequest::Logout).unwrap();
    assert!(matches!(
        next_response(&mut rx).await,
        ApiResponse::LogoutResult(Ok(()))
    ));
    assert_eq!(transport.count("/api/auth/logout"), 1);
    assert!(store.load().unwrap().is_none());
}
