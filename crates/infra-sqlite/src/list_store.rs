// SQLite ListStore Implementation

use crate::error_map::map_sqlx_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tasklist_core::domain::{format_timestamp, ItemPatch, ListItem, TodoList};
use tasklist_core::error::{AppError, Result};
use tasklist_core::port::ListStore;

pub struct SqliteListStore {
    pool: SqlitePool,
}

impl SqliteListStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Database(format!("invalid stored timestamp '{}': {}", raw, e)))
}

#[derive(sqlx::FromRow)]
struct ListRow {
    user_id: String,
    list_id: String,
    name: String,
    created_at: String,
}

impl ListRow {
    fn into_list(self) -> Result<TodoList> {
        Ok(TodoList {
            list_id: self.list_id,
            user_id: self.user_id,
            name: self.name,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    item_id: String,
    text: String,
    created_at: String,
    completed: bool,
}

impl ItemRow {
    fn into_item(self) -> Result<ListItem> {
        Ok(ListItem {
            item_id: self.item_id,
            text: self.text,
            created_at: parse_timestamp(&self.created_at)?,
            completed: self.completed,
        })
    }
}

#[async_trait]
impl ListStore for SqliteListStore {
    async fn put_list(&self, list: &TodoList) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO lists (user_id, list_id, name, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&list.user_id)
        .bind(&list.list_id)
        .bind(&list.name)
        .bind(format_timestamp(&list.created_at))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn get_list(&self, user_id: &str, list_id: &str) -> Result<Option<TodoList>> {
        let row: Option<ListRow> = sqlx::query_as(
            "SELECT user_id, list_id, name, created_at FROM lists
             WHERE user_id = ? AND list_id = ?",
        )
        .bind(user_id)
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(ListRow::into_list).transpose()
    }

    async fn rename_list(&self, user_id: &str, list_id: &str, name: &str) -> Result<()> {
        sqlx::query("UPDATE lists SET name = ? WHERE user_id = ? AND list_id = ?")
            .bind(name)
            .bind(user_id)
            .bind(list_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn delete_list(&self, user_id: &str, list_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM lists WHERE user_id = ? AND list_id = ?")
            .bind(user_id)
            .bind(list_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn put_item(&self, list_id: &str, item: &ListItem) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO items (list_id, item_id, text, created_at, completed)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(list_id)
        .bind(&item.item_id)
        .bind(&item.text)
        .bind(format_timestamp(&item.created_at))
        .bind(item.completed)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn get_item(&self, list_id: &str, item_id: &str) -> Result<Option<ListItem>> {
        let row: Option<ItemRow> = sqlx::query_as(
            "SELECT item_id, text, created_at, completed FROM items
             WHERE list_id = ? AND item_id = ?",
        )
        .bind(list_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(ItemRow::into_item).transpose()
    }

    async fn update_item(&self, list_id: &str, item_id: &str, patch: &ItemPatch) -> Result<()> {
        if patch.is_empty() {
            return Err(AppError::Validation(
                "update requires at least one field".to_string(),
            ));
        }

        // Build the SET clause from the fields actually present, so absent
        // fields never overwrite stored values
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE items SET ");
        let mut assignments = qb.separated(", ");
        if let Some(text) = &patch.text {
            assignments.push("text = ").push_bind_unseparated(text.as_str());
        }
        if let Some(completed) = patch.completed {
            assignments
                .push("completed = ")
                .push_bind_unseparated(completed);
        }
        qb.push(" WHERE list_id = ")
            .push_bind(list_id)
            .push(" AND item_id = ")
            .push_bind(item_id);

        qb.build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM items WHERE list_id = ? AND item_id = ?")
            .bind(list_id)
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn query_items(&self, list_id: &str) -> Result<Vec<ListItem>> {
        // Natural query order: ascending item id within the list partition,
        // mirroring a compound partition/sort key scheme
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT item_id, text, created_at, completed FROM items
             WHERE list_id = ?
             ORDER BY item_id",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ItemRow::into_item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn store() -> SqliteListStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteListStore::new(pool)
    }

    fn item(item_id: &str, text: &str) -> ListItem {
        ListItem {
            item_id: item_id.to_string(),
            text: text.to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            completed: false,
        }
    }

    #[tokio::test]
    async fn test_list_roundtrip() {
        let store = store().await;
        let list = TodoList {
            list_id: "L1".to_string(),
            user_id: "u1".to_string(),
            name: "groceries".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        store.put_list(&list).await.unwrap();
        assert_eq!(store.get_list("u1", "L1").await.unwrap(), Some(list));
        assert_eq!(store.get_list("u2", "L1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_query_items_ordered_by_item_id() {
        let store = store().await;
        store.put_item("L1", &item("i2", "second")).await.unwrap();
        store.put_item("L1", &item("i1", "first")).await.unwrap();
        store.put_item("L2", &item("i3", "other list")).await.unwrap();

        let items = store.query_items("L1").await.unwrap();

        let ids: Vec<&str> = items.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i2"]);
    }

    #[tokio::test]
    async fn test_query_unknown_list_is_empty_not_error() {
        let store = store().await;
        assert!(store.query_items("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update_only_touches_present_fields() {
        let store = store().await;
        store.put_item("L1", &item("i1", "buy milk")).await.unwrap();

        store
            .update_item(
                "L1",
                "i1",
                &ItemPatch {
                    text: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap();

        let updated = store.get_item("L1", "i1").await.unwrap().unwrap();
        assert_eq!(updated.text, "buy milk");
        assert!(updated.completed);

        store
            .update_item(
                "L1",
                "i1",
                &ItemPatch {
                    text: Some("buy oat milk".to_string()),
                    completed: None,
                },
            )
            .await
            .unwrap();

        let updated = store.get_item("L1", "i1").await.unwrap().unwrap();
        assert_eq!(updated.text, "buy oat milk");
        assert!(updated.completed, "absent field must not change");
    }

    #[tokio::test]
    async fn test_empty_patch_is_rejected() {
        let store = store().await;
        let err = store
            .update_item("L1", "i1", &ItemPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_item_and_list() {
        let store = store().await;
        store.put_item("L1", &item("i1", "a")).await.unwrap();
        store.delete_item("L1", "i1").await.unwrap();
        assert!(store.get_item("L1", "i1").await.unwrap().is_none());

        let list = TodoList {
            list_id: "L1".to_string(),
            user_id: "u1".to_string(),
            name: "n".to_string(),
            created_at: Utc::now(),
        };
        store.put_list(&list).await.unwrap();
        store.delete_list("u1", "L1").await.unwrap();
        assert!(store.get_list("u1", "L1").await.unwrap().is_none());
    }
}
