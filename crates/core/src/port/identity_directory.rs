// Identity Directory Port (Interface)

use crate::domain::UserIdentity;
use crate::error::Result;
use async_trait::async_trait;

/// Directory interface mapping a user id to a notification identity
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Resolve a user's notification address.
    ///
    /// # Errors
    /// - `AppError::NotFound` if the user has no directory record
    /// - `AppError::AttributeNotFound` if the record lacks an email attribute
    async fn lookup(&self, user_id: &str) -> Result<UserIdentity>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Static directory: a user maps to Some(email), to None (record exists
    /// but the email attribute is missing), or to nothing (unknown user).
    pub struct StaticDirectory {
        entries: Mutex<HashMap<String, Option<String>>>,
    }

    impl StaticDirectory {
        pub fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }

        pub fn with_user(self, user_id: impl Into<String>, email: impl Into<String>) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(user_id.into(), Some(email.into()));
            self
        }

        pub fn with_missing_email(self, user_id: impl Into<String>) -> Self {
            self.entries.lock().unwrap().insert(user_id.into(), None);
            self
        }
    }

    impl Default for StaticDirectory {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl IdentityDirectory for StaticDirectory {
        async fn lookup(&self, user_id: &str) -> Result<UserIdentity> {
            match self.entries.lock().unwrap().get(user_id) {
                Some(Some(email)) => Ok(UserIdentity {
                    user_id: user_id.to_string(),
                    email: email.clone(),
                }),
                Some(None) => Err(AppError::AttributeNotFound {
                    user_id: user_id.to_string(),
                    attribute: "email".to_string(),
                }),
                None => Err(AppError::NotFound(format!(
                    "user {} not found in identity directory",
                    user_id
                ))),
            }
        }
    }
}
