//! Concurrent traffic through one shared bridge.

use std::time::Instant;

use axum::http::StatusCode;

use grpc_bridge::rpc::proto::{AppResponse, TokenResponse};

mod common;

use common::{form_request, json_request, send, MockAuth, RecordingLogger};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_one_table() {
    let mock = MockAuth::new();
    let logger = RecordingLogger::new();
    mock.user_token.returns(TokenResponse {
        access_token: "tok".into(),
    });
    mock.create_app.returns(AppResponse {
        id: "a1".into(),
        ..Default::default()
    });
    let router = common::router(&mock, &logger);

    let concurrency = 20;
    let requests_per_task = 50;
    let total_requests = concurrency * requests_per_task;
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            let mut ok = 0;
            for i in 0..requests_per_task {
                let request = if (task + i) % 2 == 0 {
                    form_request("/v1/users/token", "email=a@b.com&password=pw")
                } else {
                    json_request("POST", "/v1/apps", r#"{"org_id":"o1"}"#)
                };
                let (status, _, _) = send(router.clone(), request).await;
                if status == StatusCode::OK {
                    ok += 1;
                }
            }
            ok
        }));
    }

    let mut succeeded = 0;
    for task in tasks {
        succeeded += task.await.unwrap();
    }

    println!(
        "{} requests in {:?} ({} ok)",
        total_requests,
        start.elapsed(),
        succeeded
    );
    assert_eq!(succeeded, total_requests);
    assert_eq!(mock.total_calls(), total_requests);
    assert_eq!(mock.user_token.call_count(), total_requests / 2);
}
