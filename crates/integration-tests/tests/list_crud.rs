//! List/item CRUD over the SQLite store through the service layer.

use std::sync::Arc;
use tasklist_core::application::ListService;
use tasklist_core::domain::ItemPatch;
use tasklist_core::error::AppError;
use tasklist_core::port::id_provider::mocks::SequentialIdProvider;
use tasklist_core::port::time_provider::mocks::FixedTimeProvider;
use tasklist_infra_sqlite::{create_pool, run_migrations, SqliteListStore};

const START_MILLIS: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

async fn service() -> ListService {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    ListService::new(
        Arc::new(SqliteListStore::new(pool)),
        Arc::new(SequentialIdProvider::new()),
        Arc::new(FixedTimeProvider::new(START_MILLIS)),
    )
}

#[tokio::test]
async fn test_list_lifecycle() {
    let svc = service().await;

    let list = svc.create_list("u1", "groceries").await.unwrap();
    assert_eq!(list.created_at_rfc3339(), "2024-01-01T00:00:00Z");

    let fetched = svc.get_list("u1", &list.list_id).await.unwrap();
    assert_eq!(fetched, list);

    svc.rename_list("u1", &list.list_id, "weekly groceries")
        .await
        .unwrap();
    assert_eq!(
        svc.get_list("u1", &list.list_id).await.unwrap().name,
        "weekly groceries"
    );

    svc.delete_list("u1", &list.list_id).await.unwrap();
    let err = svc.get_list("u1", &list.list_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_items_query_in_natural_store_order() {
    let svc = service().await;

    // Sequential ids: id-1, id-2, id-3; the store orders by item id
    svc.add_item("L1", "first").await.unwrap();
    svc.add_item("L1", "second").await.unwrap();
    svc.add_item("L1", "third").await.unwrap();

    let items = svc.list_items("L1").await.unwrap();
    let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_unknown_list_yields_empty_not_error() {
    let svc = service().await;
    assert!(svc.list_items("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_item_partial_update_semantics() {
    let svc = service().await;
    let item = svc.add_item("L1", "buy milk").await.unwrap();

    // Update only completion; text must survive
    svc.update_item(
        "L1",
        &item.item_id,
        ItemPatch {
            text: None,
            completed: Some(true),
        },
    )
    .await
    .unwrap();

    let updated = svc.get_item("L1", &item.item_id).await.unwrap();
    assert_eq!(updated.text, "buy milk");
    assert!(updated.completed);

    // Update only text; completion must survive
    svc.update_item(
        "L1",
        &item.item_id,
        ItemPatch {
            text: Some("buy oat milk".to_string()),
            completed: None,
        },
    )
    .await
    .unwrap();

    let updated = svc.get_item("L1", &item.item_id).await.unwrap();
    assert_eq!(updated.text, "buy oat milk");
    assert!(updated.completed);
}

#[tokio::test]
async fn test_empty_patch_rejected() {
    let svc = service().await;
    let item = svc.add_item("L1", "buy milk").await.unwrap();

    let err = svc
        .update_item("L1", &item.item_id, ItemPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_blank_inputs_rejected() {
    let svc = service().await;

    assert!(matches!(
        svc.create_list("u1", " ").await.unwrap_err(),
        AppError::Validation(_)
    ));
    assert!(matches!(
        svc.add_item("L1", "").await.unwrap_err(),
        AppError::Validation(_)
    ));
}

#[tokio::test]
async fn test_delete_item() {
    let svc = service().await;
    let item = svc.add_item("L1", "buy milk").await.unwrap();

    svc.delete_item("L1", &item.item_id).await.unwrap();

    assert!(svc.list_items("L1").await.unwrap().is_empty());
    let err = svc.get_item("L1", &item.item_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
