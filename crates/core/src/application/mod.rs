// Application Layer - Use Cases and Business Logic

pub mod export;
pub mod lists;
pub mod worker;

// Re-exports
pub use export::{ExportPipeline, ExportRequest, ExportService};
pub use lists::ListService;
pub use worker::{shutdown_channel, ExportWorker, ShutdownSender, ShutdownToken};
