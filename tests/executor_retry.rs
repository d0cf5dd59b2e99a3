//! Integration tests for the retrying request executor, driven through the
//! public client against a scripted local stub server.

mod common;

use common::{processing_status_body, StubServer};
use docflow_link::{DocflowLinkClient, DocflowLinkError, JobStatus};

fn client_for(server: &StubServer, max_retries: u32) -> DocflowLinkClient {
    DocflowLinkClient::builder()
        .base_url(server.base_url.clone())
        .max_retries(max_retries)
        .retry_base_delay_ms(1)
        .build()
        .expect("client must build")
}

#[tokio::test]
async fn test_permanent_503_issues_exactly_max_attempts_then_rejects() {
    let server = StubServer::spawn(vec![(503, String::new())], false).await;
    let client = client_for(&server, 3);

    let result = client.fetch_status("session-1").await;
    match result {
        Err(DocflowLinkError::HttpServerError { status, correlation_id, .. }) => {
            assert_eq!(status, 503);
            assert!(correlation_id.is_some());
        },
        other => panic!("expected HttpServerError, got {:?}", other),
    }
    assert_eq!(server.hit_count(), 3, "one physical request per attempt");
}

#[tokio::test]
async fn test_503_then_success_stops_retrying() {
    let server = StubServer::spawn(
        vec![(503, String::new()), (200, processing_status_body("session-1"))],
        false,
    )
    .await;
    let client = client_for(&server, 3);

    let snapshot = client.fetch_status("session-1").await.expect("second attempt succeeds");
    assert_eq!(snapshot.status, Some(JobStatus::Processing));
    assert_eq!(server.hit_count(), 2, "success must stop the retry loop");
}

#[tokio::test]
async fn test_400_fails_immediately_without_retry() {
    let server = StubServer::spawn(vec![(400, r#"{"message":"bad session"}"#.to_string())], false).await;
    let client = client_for(&server, 3);

    let result = client.fetch_status("session-1").await;
    match result {
        Err(DocflowLinkError::HttpClientError { status, message, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "bad session");
        },
        other => panic!("expected HttpClientError, got {:?}", other),
    }
    assert_eq!(server.hit_count(), 1, "non-retryable status must not retry");
}

#[tokio::test]
async fn test_correlation_id_is_stable_across_retries() {
    let server = StubServer::spawn(vec![(503, String::new())], false).await;
    let client = client_for(&server, 3);

    let _ = client.fetch_status("session-1").await;

    let correlation_ids = server.header_values("x-correlation-id");
    assert_eq!(correlation_ids.len(), 3);
    assert!(!correlation_ids[0].is_empty());
    assert!(
        correlation_ids.iter().all(|id| id == &correlation_ids[0]),
        "one logical call keeps one correlation id: {:?}",
        correlation_ids
    );

    // Mirrored request-id header carries the same value.
    let request_ids = server.header_values("x-request-id");
    assert_eq!(request_ids, correlation_ids);
}

#[tokio::test]
async fn test_diagnostics_record_every_attempt() {
    let server = StubServer::spawn(
        vec![(503, String::new()), (200, processing_status_body("session-1"))],
        false,
    )
    .await;
    let client = client_for(&server, 3);

    client.fetch_status("session-1").await.expect("succeeds on retry");

    let records = client.diagnostics();
    assert_eq!(records.len(), 2, "one record per physical attempt");
    assert_eq!(records[0].status, Some(503));
    assert!(!records[0].success);
    assert_eq!(records[1].status, Some(200));
    assert!(records[1].success);
    assert_eq!(records[0].correlation_id, records[1].correlation_id);
    assert_eq!(records[0].endpoint, "/status/session-1");
}
