// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod identity_directory;
pub mod job_queue;
pub mod list_store;
pub mod mailer;
pub mod object_store;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use identity_directory::IdentityDirectory;
pub use job_queue::{JobQueue, MessageState, QueuedMessage};
pub use list_store::ListStore;
pub use mailer::Mailer;
pub use object_store::ObjectStore;
pub use time_provider::TimeProvider;
