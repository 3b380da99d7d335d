// Tasklist Infrastructure - SQLite Adapters
// Implements: ListStore, JobQueue, IdentityDirectory

mod connection;
mod error_map;
mod identity_directory;
mod job_queue;
mod list_store;
mod migration;

pub use connection::create_pool;
pub use identity_directory::{SqliteIdentityDirectory, EMAIL_ATTRIBUTE};
pub use job_queue::{QueueConfig, SqliteJobQueue};
pub use list_store::SqliteListStore;
pub use migration::run_migrations;

// Note: sqlx::Error conversion is handled by the error_map helper
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
