// List & Item Domain Models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Render a timestamp as RFC 3339 with second precision and `Z` suffix.
///
/// Single source of truth for every user-visible timestamp (CSV rows, API
/// responses, stored values), so exports stay byte-deterministic.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A to-do list owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub list_id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl TodoList {
    pub fn created_at_rfc3339(&self) -> String {
        format_timestamp(&self.created_at)
    }
}

/// A single entry of a to-do list.
///
/// Owned by the data store; the export pipeline only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub item_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

impl ListItem {
    pub fn created_at_rfc3339(&self) -> String {
        format_timestamp(&self.created_at)
    }
}

/// Partial update for an item: only present fields are written, absent
/// fields never overwrite stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_is_seconds_with_z() {
        let at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00.12345Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(&at), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_item_patch_emptiness() {
        assert!(ItemPatch::default().is_empty());
        assert!(!ItemPatch {
            text: Some("milk".to_string()),
            completed: None,
        }
        .is_empty());
        assert!(!ItemPatch {
            text: None,
            completed: Some(true),
        }
        .is_empty());
    }
}
