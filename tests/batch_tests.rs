#![allow(clippy::unwrap_used)]

mod common;

use common::client_for;
use emaillistchecker::{
    BatchOptions, BatchResults, BatchStatus, Error, ResultsFilter, ResultsFormat, Verdict,
    MAX_BATCH_SIZE,
};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{
    body_json, body_partial_json, body_string_contains, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn batch_body(id: serde_json::Value, status: &str, progress: u8) -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "id": id,
            "name": "Newsletter",
            "status": status,
            "progress": progress,
            "total_emails": 3,
            "processed_emails": 3 * progress as u64 / 100,
            "valid_emails": 1,
            "invalid_emails": 1,
            "unknown_emails": 0,
            "created_at": "2026-01-15T10:30:00Z"
        }
    })
}

#[tokio::test]
async fn test_submit_batch_then_read_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/verify/batch"))
        .and(body_json(json!({
            "emails": ["a@x.co", "b@x.co", "c@x.co"],
            "auto_start": true,
            "name": "Newsletter"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(batch_body(json!(123), "pending", 0)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(batch_body(json!(123), "processing", 42)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let batch = client
        .verify_batch(&["a@x.co", "b@x.co", "c@x.co"], Some("Newsletter"))
        .await
        .unwrap();
    assert_eq!(batch.id, "123");
    assert_eq!(batch.status, BatchStatus::Pending);
    assert!(!batch.is_terminal());

    let status = client.get_batch_status(&batch.id).await.unwrap();
    assert_eq!(status.status, BatchStatus::Processing);
    assert_eq!(status.progress, 42);
    assert_eq!(status.total_emails, 3);
    assert!(status.created_at().is_some());
}

#[tokio::test]
async fn test_batch_options_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/verify/batch"))
        .and(body_partial_json(json!({
            "auto_start": false,
            "callback_url": "https://hooks.example.com/done"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(batch_body(json!("b-1"), "pending", 0)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let emails = vec!["a@x.co".to_string()];
    let options = BatchOptions::default()
        .callback_url("https://hooks.example.com/done")
        .auto_start(false);
    let batch = client_for(&server)
        .verify_batch_with(&emails, options)
        .await
        .unwrap();
    assert_eq!(batch.id, "b-1");
}

#[tokio::test]
async fn test_empty_and_oversized_batches_are_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let empty: Vec<String> = Vec::new();
    let err = client.verify_batch(&empty, None).await.unwrap_err();
    assert!(matches!(err, Error::Validation { status: None, .. }));

    let too_many = vec!["a@x.co"; MAX_BATCH_SIZE + 1];
    let err = client.verify_batch(&too_many, None).await.unwrap_err();
    assert!(matches!(err, Error::Validation { status: None, .. }));
}

#[tokio::test]
async fn test_wait_for_batch_polls_until_completed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/77"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(batch_body(json!(77), "processing", 50)),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/77"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(batch_body(json!(77), "completed", 100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let batch = client_for(&server)
        .wait_for_batch("77", Duration::from_millis(10), 10)
        .await
        .unwrap();
    assert_eq!(batch.status, BatchStatus::Completed);
    assert_eq!(batch.progress, 100);
}

#[tokio::test]
async fn test_wait_for_batch_gives_up_after_max_polls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(batch_body(json!(9), "processing", 10)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .wait_for_batch("9", Duration::from_millis(5), 3)
        .await
        .unwrap_err();
    match err {
        Error::BatchIncomplete { batch_id, status } => {
            assert_eq!(batch_id, "9");
            assert_eq!(status, BatchStatus::Processing);
        }
        other => panic!("expected BatchIncomplete, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_batch_ends_the_wait() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(batch_body(json!(5), "failed", 30)))
        .expect(1)
        .mount(&server)
        .await;

    let batch = client_for(&server)
        .wait_for_batch("5", Duration::from_millis(5), 0)
        .await
        .unwrap();
    assert_eq!(batch.status, BatchStatus::Failed);
    assert!(batch.is_terminal());
}

#[tokio::test]
async fn test_json_results_are_typed_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/123/results"))
        .and(query_param("format", "json"))
        .and(query_param("filter", "valid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"email": "a@x.co", "result": "deliverable", "score": 0.98},
                {"email": "b@x.co", "result": "deliverable", "score": 0.91}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .get_batch_results("123", ResultsFormat::Json, ResultsFilter::Valid)
        .await
        .unwrap();
    let records = results.into_records().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.result == Verdict::Deliverable));
}

#[tokio::test]
async fn test_results_of_unfinished_batch_are_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/123/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"status": "processing", "progress": 40}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_batch_results("123", ResultsFormat::Json, ResultsFilter::All)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::BatchIncomplete {
            status: BatchStatus::Processing,
            ..
        }
    ));
}

#[tokio::test]
async fn test_status_beside_the_data_envelope_is_not_an_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/123/results"))
        .and(query_param("format", "json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "processing", "data": []})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/123/results"))
        .and(query_param("format", "csv"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "pending", "data": ""})),
        )
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = client
        .get_batch_results("123", ResultsFormat::Json, ResultsFilter::All)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::BatchIncomplete {
            status: BatchStatus::Processing,
            ..
        }
    ));

    let err = client
        .get_batch_results("123", ResultsFormat::Csv, ResultsFilter::All)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::BatchIncomplete {
            status: BatchStatus::Pending,
            ..
        }
    ));
}

#[tokio::test]
async fn test_completed_envelope_with_no_matches_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/123/results"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "completed", "data": []})),
        )
        .mount(&server)
        .await;

    let results = client_for(&server)
        .get_batch_results("123", ResultsFormat::Json, ResultsFilter::Risky)
        .await
        .unwrap();
    assert_eq!(results.records(), Some(&[][..]));
}

#[tokio::test]
async fn test_csv_results_are_returned_as_text() {
    let server = MockServer::start().await;
    let csv = "email,result,score\na@x.co,deliverable,0.98\n";
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/123/results"))
        .and(query_param("format", "csv"))
        .and(query_param("filter", "all"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string(csv),
        )
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .get_batch_results("123", ResultsFormat::Csv, ResultsFilter::All)
        .await
        .unwrap();
    assert_eq!(results, BatchResults::Export(csv.to_string()));
    assert_eq!(results.export(), Some(csv));
    assert!(results.records().is_none());
}

#[tokio::test]
async fn test_unknown_batch_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/verify/batch/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Batch not found"})))
        .mount(&server)
        .await;

    let err = client_for(&server).get_batch_status("nope").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_file_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/verify/batch/upload"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("filename=\"leads.csv\""))
        .and(body_string_contains("name=\"auto_start\""))
        .and(body_string_contains("name=\"name\""))
        .and(body_string_contains("lead@x.co"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(batch_body(json!(321), "pending", 0)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("leads.csv");
    let mut file = std::fs::File::create(&file_path).unwrap();
    writeln!(file, "email\nlead@x.co").unwrap();
    drop(file);

    let batch = client_for(&server)
        .verify_batch_file(&file_path, BatchOptions::default().name("Leads"))
        .await
        .unwrap();
    assert_eq!(batch.id, "321");
}

#[tokio::test]
async fn test_missing_upload_file_is_io_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let err = client_for(&server)
        .verify_batch_file(dir.path().join("missing.csv"), BatchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
