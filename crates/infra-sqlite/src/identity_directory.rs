// SQLite IdentityDirectory Implementation
//
// Profile attributes live in one JSON document per user; the notification
// address is the `email` attribute of that document.

use crate::error_map::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tasklist_core::domain::UserIdentity;
use tasklist_core::error::{AppError, Result};
use tasklist_core::port::IdentityDirectory;

/// Directory attribute holding the notification address
pub const EMAIL_ATTRIBUTE: &str = "email";

pub struct SqliteIdentityDirectory {
    pool: SqlitePool,
}

impl SqliteIdentityDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a user's attribute document (directory seeding)
    pub async fn put_user(&self, user_id: &str, attributes: &serde_json::Value) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO users (user_id, attributes) VALUES (?, ?)")
            .bind(user_id)
            .bind(attributes.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl IdentityDirectory for SqliteIdentityDirectory {
    async fn lookup(&self, user_id: &str) -> Result<UserIdentity> {
        let row: Option<(String,)> = sqlx::query_as("SELECT attributes FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let raw = row.ok_or_else(|| {
            AppError::NotFound(format!("user {} not found in identity directory", user_id))
        })?;

        let attributes: serde_json::Value = serde_json::from_str(&raw.0)?;

        let email = attributes
            .get(EMAIL_ATTRIBUTE)
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::AttributeNotFound {
                user_id: user_id.to_string(),
                attribute: EMAIL_ATTRIBUTE.to_string(),
            })?;

        Ok(UserIdentity {
            user_id: user_id.to_string(),
            email: email.to_string(),
        })
    }
}
