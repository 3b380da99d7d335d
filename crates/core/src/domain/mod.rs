// Domain Layer - Pure business entities

pub mod claims;
pub mod export;
pub mod identity;
pub mod list;

// Re-exports
pub use claims::CallerClaims;
pub use export::{ExportArtifact, ExportJob, JobOutcome};
pub use identity::UserIdentity;
pub use list::{format_timestamp, ItemPatch, ListItem, TodoList};
