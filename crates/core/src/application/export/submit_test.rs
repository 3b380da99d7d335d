//! Unit tests for export submission

use super::submit::{execute, ExportRequest};
use crate::domain::CallerClaims;
use crate::error::AppError;
use crate::port::job_queue::mocks::InMemoryJobQueue;

fn request(list_id: &str, sub: Option<&str>, username: Option<&str>) -> ExportRequest {
    ExportRequest {
        list_id: list_id.to_string(),
        claims: CallerClaims {
            sub: sub.map(String::from),
            username: username.map(String::from),
        },
    }
}

#[tokio::test]
async fn test_submit_enqueues_exactly_one_message() {
    let queue = InMemoryJobQueue::new();

    let message_id = execute(&queue, request("L1", Some("u-42"), None))
        .await
        .unwrap();

    assert!(!message_id.is_empty());
    assert_eq!(queue.message_count(), 1);
    assert_eq!(queue.bodies(), vec![r#"{"listId":"L1","userId":"u-42"}"#]);
}

#[tokio::test]
async fn test_submit_falls_back_to_username_claim() {
    let queue = InMemoryJobQueue::new();

    execute(&queue, request("L1", None, Some("alice")))
        .await
        .unwrap();

    assert_eq!(queue.bodies(), vec![r#"{"listId":"L1","userId":"alice"}"#]);
}

#[tokio::test]
async fn test_submit_without_identity_is_unauthorized() {
    let queue = InMemoryJobQueue::new();

    let err = execute(&queue, request("L1", None, None)).await.unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert_eq!(queue.message_count(), 0, "nothing may be enqueued");
}

#[tokio::test]
async fn test_submit_blank_claims_are_unauthorized() {
    let queue = InMemoryJobQueue::new();

    let err = execute(&queue, request("L1", Some("  "), Some("")))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert_eq!(queue.message_count(), 0);
}

#[tokio::test]
async fn test_submit_rejects_empty_list_id() {
    let queue = InMemoryJobQueue::new();

    let err = execute(&queue, request("  ", Some("u-42"), None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(queue.message_count(), 0);
}

#[tokio::test]
async fn test_submit_surfaces_enqueue_failure() {
    let queue = InMemoryJobQueue::new();
    queue.fail_enqueue_with("queue unavailable");

    let err = execute(&queue, request("L1", Some("u-42"), None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Queue(_)));
}
