// Submit Export Use Case
//
// Producer side of the pipeline: validate, resolve the caller identity,
// enqueue exactly one job message. Returns as soon as the message is
// accepted by the queue; processing happens asynchronously.

use crate::domain::{CallerClaims, ExportJob};
use crate::error::{AppError, Result};
use crate::port::JobQueue;
use std::sync::Arc;
use tracing::info;

/// Export submission request
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub list_id: String,
    pub claims: CallerClaims,
}

/// Execute the submit use case
///
/// # Errors
/// - `AppError::Validation` for a blank list id (never enqueued)
/// - `AppError::Unauthorized` when the claims resolve to no user identity
/// - queue infrastructure failures propagate, never silently swallowed
pub async fn execute(queue: &dyn JobQueue, req: ExportRequest) -> Result<String> {
    if req.list_id.trim().is_empty() {
        return Err(AppError::Validation("listId must not be empty".to_string()));
    }

    let user_id = req.claims.resolve_user_id().ok_or_else(|| {
        AppError::Unauthorized("no resolvable user identity in caller claims".to_string())
    })?;

    let job = ExportJob {
        list_id: req.list_id,
        user_id,
    };
    let body = serde_json::to_string(&job)?;

    let message_id = queue.enqueue(&body).await?;

    info!(
        message_id = %message_id,
        list_id = %job.list_id,
        user_id = %job.user_id,
        "Export job enqueued"
    );

    Ok(message_id)
}

/// Export Service - submit entry point with an injected queue
pub struct ExportService {
    queue: Arc<dyn JobQueue>,
}

impl ExportService {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    /// Submit an export request; returns the queue message id
    pub async fn submit(&self, req: ExportRequest) -> Result<String> {
        execute(self.queue.as_ref(), req).await
    }
}
