//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};
use tasklist_core::domain::{CallerClaims, ListItem, TodoList};

/// export.request.v1 - Request an asynchronous CSV export
#[derive(Debug, Deserialize)]
pub struct ExportRequestParams {
    pub list_id: String,
    #[serde(default)]
    pub claims: CallerClaims,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportRequestResponse {
    pub message_id: String,
    pub status: String,
    pub message: String,
}

/// list.create.v1
#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateListResponse {
    pub list_id: String,
}

/// list.get.v1
#[derive(Debug, Deserialize)]
pub struct GetListRequest {
    pub user_id: String,
    pub list_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub user_id: String,
    pub list_id: String,
    pub name: String,
    pub created_at: String,
}

impl From<TodoList> for ListResponse {
    fn from(list: TodoList) -> Self {
        let created_at = list.created_at_rfc3339();
        Self {
            user_id: list.user_id,
            list_id: list.list_id,
            name: list.name,
            created_at,
        }
    }
}

/// list.rename.v1
#[derive(Debug, Deserialize)]
pub struct RenameListRequest {
    pub user_id: String,
    pub list_id: String,
    pub name: String,
}

/// list.delete.v1
#[derive(Debug, Deserialize)]
pub struct DeleteListRequest {
    pub user_id: String,
    pub list_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedResponse {
    pub updated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// item.add.v1
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub list_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddItemResponse {
    pub item_id: String,
}

/// item.get.v1 / item.list.v1
#[derive(Debug, Deserialize)]
pub struct GetItemRequest {
    pub list_id: String,
    pub item_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListItemsRequest {
    pub list_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    pub item_id: String,
    pub text: String,
    pub created_at: String,
    pub completed: bool,
}

impl From<ListItem> for ItemResponse {
    fn from(item: ListItem) -> Self {
        let created_at = item.created_at_rfc3339();
        Self {
            item_id: item.item_id,
            text: item.text,
            created_at,
            completed: item.completed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListItemsResponse {
    pub items: Vec<ItemResponse>,
}

/// item.update.v1 - partial update: absent fields are left untouched
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub list_id: String,
    pub item_id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// item.delete.v1
#[derive(Debug, Deserialize)]
pub struct DeleteItemRequest {
    pub list_id: String,
    pub item_id: String,
}

/// admin.stats.v1
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub queued_messages: i64,
    pub leased_messages: i64,
    pub done_messages: i64,
    pub dead_messages: i64,
    pub uptime_seconds: i64,
}
