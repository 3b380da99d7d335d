// List Store Port (Interface)
//
// Keyed document store for lists and their items. Items of one list share a
// partition (the list id) so a single query returns them all; the store's
// natural query order is by item id, mirroring a compound partition/sort key
// scheme.

use crate::domain::{ItemPatch, ListItem, TodoList};
use crate::error::Result;
use async_trait::async_trait;

/// Store interface for lists and items
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Insert or replace a list
    async fn put_list(&self, list: &TodoList) -> Result<()>;

    /// Fetch a list by owner and id
    async fn get_list(&self, user_id: &str, list_id: &str) -> Result<Option<TodoList>>;

    /// Rename a list
    async fn rename_list(&self, user_id: &str, list_id: &str, name: &str) -> Result<()>;

    /// Delete a list
    async fn delete_list(&self, user_id: &str, list_id: &str) -> Result<()>;

    /// Insert or replace an item under a list's partition
    async fn put_item(&self, list_id: &str, item: &ListItem) -> Result<()>;

    /// Fetch a single item
    async fn get_item(&self, list_id: &str, item_id: &str) -> Result<Option<ListItem>>;

    /// Apply a partial update: only fields present in the patch are written
    async fn update_item(&self, list_id: &str, item_id: &str, patch: &ItemPatch) -> Result<()>;

    /// Delete a single item
    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<()>;

    /// Fetch all items of a list in the store's natural query order.
    /// An unknown list id yields an empty result, never an error.
    async fn query_items(&self, list_id: &str) -> Result<Vec<ListItem>>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory store keyed like the real adapter: items ordered by item id
    /// within their list partition.
    pub struct InMemoryListStore {
        lists: Mutex<BTreeMap<(String, String), TodoList>>,
        items: Mutex<BTreeMap<(String, String), ListItem>>,
        fail_queries: Mutex<Option<String>>,
    }

    impl InMemoryListStore {
        pub fn new() -> Self {
            Self {
                lists: Mutex::new(BTreeMap::new()),
                items: Mutex::new(BTreeMap::new()),
                fail_queries: Mutex::new(None),
            }
        }

        /// Make item queries fail with a database error
        pub fn fail_queries_with(&self, message: impl Into<String>) {
            *self.fail_queries.lock().unwrap() = Some(message.into());
        }
    }

    impl Default for InMemoryListStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ListStore for InMemoryListStore {
        async fn put_list(&self, list: &TodoList) -> Result<()> {
            self.lists.lock().unwrap().insert(
                (list.user_id.clone(), list.list_id.clone()),
                list.clone(),
            );
            Ok(())
        }

        async fn get_list(&self, user_id: &str, list_id: &str) -> Result<Option<TodoList>> {
            Ok(self
                .lists
                .lock()
                .unwrap()
                .get(&(user_id.to_string(), list_id.to_string()))
                .cloned())
        }

        async fn rename_list(&self, user_id: &str, list_id: &str, name: &str) -> Result<()> {
            if let Some(list) = self
                .lists
                .lock()
                .unwrap()
                .get_mut(&(user_id.to_string(), list_id.to_string()))
            {
                list.name = name.to_string();
            }
            Ok(())
        }

        async fn delete_list(&self, user_id: &str, list_id: &str) -> Result<()> {
            self.lists
                .lock()
                .unwrap()
                .remove(&(user_id.to_string(), list_id.to_string()));
            Ok(())
        }

        async fn put_item(&self, list_id: &str, item: &ListItem) -> Result<()> {
            self.items.lock().unwrap().insert(
                (list_id.to_string(), item.item_id.clone()),
                item.clone(),
            );
            Ok(())
        }

        async fn get_item(&self, list_id: &str, item_id: &str) -> Result<Option<ListItem>> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .get(&(list_id.to_string(), item_id.to_string()))
                .cloned())
        }

        async fn update_item(
            &self,
            list_id: &str,
            item_id: &str,
            patch: &ItemPatch,
        ) -> Result<()> {
            if let Some(item) = self
                .items
                .lock()
                .unwrap()
                .get_mut(&(list_id.to_string(), item_id.to_string()))
            {
                if let Some(text) = &patch.text {
                    item.text = text.clone();
                }
                if let Some(completed) = patch.completed {
                    item.completed = completed;
                }
            }
            Ok(())
        }

        async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<()> {
            self.items
                .lock()
                .unwrap()
                .remove(&(list_id.to_string(), item_id.to_string()));
            Ok(())
        }

        async fn query_items(&self, list_id: &str) -> Result<Vec<ListItem>> {
            if let Some(msg) = self.fail_queries.lock().unwrap().clone() {
                return Err(AppError::Database(msg));
            }
            // BTreeMap keys are (list_id, item_id), so range iteration comes
            // back ordered by item id within the partition.
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .filter(|((lid, _), _)| lid == list_id)
                .map(|(_, item)| item.clone())
                .collect())
        }
    }
}
