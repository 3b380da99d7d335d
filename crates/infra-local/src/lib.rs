// Tasklist Infrastructure - Local Filesystem Adapters
// Implements: ObjectStore, Mailer

mod mailer;
mod object_store;

pub use mailer::OutboxMailer;
pub use object_store::FsObjectStore;
