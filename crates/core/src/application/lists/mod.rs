// List Service - CRUD use cases for lists and items

use crate::domain::{ItemPatch, ListItem, TodoList};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, ListStore, TimeProvider};
use std::sync::Arc;
use tracing::info;

/// List Service with injected store and providers
pub struct ListService {
    store: Arc<dyn ListStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl ListService {
    pub fn new(
        store: Arc<dyn ListStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            id_provider,
            time_provider,
        }
    }

    /// Create a list for a user
    pub async fn create_list(&self, user_id: &str, name: &str) -> Result<TodoList> {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "list name must not be empty".to_string(),
            ));
        }

        let list = TodoList {
            list_id: self.id_provider.generate_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            created_at: self.time_provider.now(),
        };
        self.store.put_list(&list).await?;

        info!(list_id = %list.list_id, user_id = %user_id, "List created");
        Ok(list)
    }

    pub async fn get_list(&self, user_id: &str, list_id: &str) -> Result<TodoList> {
        self.store
            .get_list(user_id, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("list {} not found", list_id)))
    }

    pub async fn rename_list(&self, user_id: &str, list_id: &str, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "list name must not be empty".to_string(),
            ));
        }
        self.store.rename_list(user_id, list_id, name).await
    }

    pub async fn delete_list(&self, user_id: &str, list_id: &str) -> Result<()> {
        self.store.delete_list(user_id, list_id).await
    }

    /// Add an item to a list; starts uncompleted
    pub async fn add_item(&self, list_id: &str, text: &str) -> Result<ListItem> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "item text must not be empty".to_string(),
            ));
        }

        let item = ListItem {
            item_id: self.id_provider.generate_id(),
            text: text.to_string(),
            created_at: self.time_provider.now(),
            completed: false,
        };
        self.store.put_item(list_id, &item).await?;

        info!(list_id = %list_id, item_id = %item.item_id, "Item added");
        Ok(item)
    }

    pub async fn get_item(&self, list_id: &str, item_id: &str) -> Result<ListItem> {
        self.store
            .get_item(list_id, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("item {} not found", item_id)))
    }

    /// Fetch all items of a list. An unknown list id yields an empty vec.
    pub async fn list_items(&self, list_id: &str) -> Result<Vec<ListItem>> {
        self.store.query_items(list_id).await
    }

    /// Apply a partial update; absent fields never overwrite stored values.
    /// An empty patch is rejected instead of issuing a no-op write.
    pub async fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> Result<()> {
        if patch.is_empty() {
            return Err(AppError::Validation(
                "update requires at least one field".to_string(),
            ));
        }
        if let Some(text) = &patch.text {
            if text.trim().is_empty() {
                return Err(AppError::Validation(
                    "item text must not be empty".to_string(),
                ));
            }
        }
        self.store.update_item(list_id, item_id, &patch).await
    }

    pub async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<()> {
        self.store.delete_item(list_id, item_id).await
    }
}
