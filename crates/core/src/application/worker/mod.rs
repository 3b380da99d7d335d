// Export Worker - queue consumption loop

pub mod constants;
mod shutdown;

use constants::*;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::export::ExportPipeline;
use crate::domain::{ExportJob, JobOutcome};
use crate::error::{AppError, Result};
use crate::port::{JobQueue, QueuedMessage};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Worker consuming export jobs from the queue.
///
/// Each message gets the full pipeline and a tagged outcome: acknowledged,
/// released for redelivery, or buried in the dead-letter state. Messages in
/// one received batch are processed sequentially and independently; a
/// failing job never aborts its siblings. The worker holds no cross-job
/// state, and queue redelivery is the only retry mechanism.
pub struct ExportWorker {
    queue: Arc<dyn JobQueue>,
    pipeline: Arc<ExportPipeline>,
    batch_size: usize,
    max_attempts: i32,
}

impl ExportWorker {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        pipeline: Arc<ExportPipeline>,
        batch_size: usize,
        max_attempts: i32,
    ) -> Self {
        Self {
            queue,
            pipeline,
            batch_size,
            max_attempts,
        }
    }

    /// Run the consumption loop with graceful shutdown support
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!("Export worker started");
        loop {
            if shutdown.is_shutdown() {
                info!("Export worker shutting down");
                break;
            }
            match self.process_batch().await {
                Ok(processed) => {
                    if processed == 0 {
                        tokio::select! {
                            _ = sleep(IDLE_SLEEP_DURATION) => {},
                            _ = shutdown.wait() => {
                                info!("Export worker interrupted during idle");
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "Export worker queue error");
                    tokio::select! {
                        _ = sleep(ERROR_RECOVERY_SLEEP_DURATION) => {},
                        _ = shutdown.wait() => {
                            info!("Export worker interrupted during error recovery");
                            break;
                        }
                    }
                }
            }
        }
        info!("Export worker stopped");
        Ok(())
    }

    /// Receive one batch and settle every message (returns batch size).
    ///
    /// Only queue infrastructure errors propagate; job failures are settled
    /// per message. Unsettled messages redeliver after their lease expires.
    pub async fn process_batch(&self) -> Result<usize> {
        let batch = self.queue.receive(self.batch_size).await?;
        let count = batch.len();
        for message in batch {
            self.process_message(message).await?;
        }
        Ok(count)
    }

    async fn process_message(&self, message: QueuedMessage) -> Result<()> {
        let outcome = self.execute(&message).await;

        match outcome {
            JobOutcome::Completed => {
                info!(message_id = %message.id, "Job completed, acknowledging message");
                self.queue.ack(&message.id).await
            }
            JobOutcome::Retry(err) => {
                if message.attempts >= self.max_attempts {
                    error!(
                        message_id = %message.id,
                        attempts = message.attempts,
                        error = %err,
                        "Retries exhausted, moving message to dead letter"
                    );
                    self.queue
                        .bury(&message.id, &format!("retries exhausted: {}", err))
                        .await
                } else {
                    warn!(
                        message_id = %message.id,
                        attempts = message.attempts,
                        error = %err,
                        "Job failed, releasing message for redelivery"
                    );
                    self.queue.release(&message.id).await
                }
            }
            JobOutcome::Dead(err) => {
                error!(
                    message_id = %message.id,
                    error = %err,
                    "Job failed permanently, moving message to dead letter"
                );
                self.queue.bury(&message.id, &err.to_string()).await
            }
        }
    }

    /// Run the pipeline inside a spawned task so a panic cannot kill the
    /// daemon. A panicked job counts as a retryable failure bounded by the
    /// attempt cap.
    async fn execute(&self, message: &QueuedMessage) -> JobOutcome {
        let pipeline = Arc::clone(&self.pipeline);
        let body = message.body.clone();

        let handle = tokio::task::spawn(async move { run_pipeline(&pipeline, &body).await });

        match handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                if join_err.is_panic() {
                    error!(message_id = %message.id, error = %join_err, "Job task panicked");
                } else {
                    error!(message_id = %message.id, error = %join_err, "Job task cancelled");
                }
                JobOutcome::Retry(AppError::Internal(format!("job task died: {}", join_err)))
            }
        }
    }
}

async fn run_pipeline(pipeline: &ExportPipeline, body: &str) -> JobOutcome {
    // Poison message: undecodable payloads can never succeed
    let job: ExportJob = match serde_json::from_str(body) {
        Ok(job) => job,
        Err(e) => {
            error!(error = %e, "Malformed job payload");
            return JobOutcome::Dead(AppError::Serialization(e));
        }
    };

    if job.user_id.trim().is_empty() {
        return JobOutcome::Dead(AppError::Validation(
            "job payload has empty userId".to_string(),
        ));
    }

    match pipeline.process(&job).await {
        Ok(artifact) => {
            info!(list_id = %job.list_id, artifact_url = %artifact.url, "Export finished");
            JobOutcome::Completed
        }
        Err(e) if e.is_permanent() => JobOutcome::Dead(e),
        Err(e) => JobOutcome::Retry(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::identity_directory::mocks::StaticDirectory;
    use crate::port::job_queue::mocks::InMemoryJobQueue;
    use crate::port::list_store::mocks::InMemoryListStore;
    use crate::port::mailer::mocks::RecordingMailer;
    use crate::port::object_store::mocks::RecordingObjectStore;
    use crate::port::time_provider::mocks::FixedTimeProvider;
    use crate::port::MessageState;

    struct Harness {
        queue: Arc<InMemoryJobQueue>,
        object_store: Arc<RecordingObjectStore>,
        mailer: Arc<RecordingMailer>,
        worker: ExportWorker,
    }

    fn harness(directory: StaticDirectory, max_attempts: i32) -> Harness {
        let queue = Arc::new(InMemoryJobQueue::new());
        let object_store = Arc::new(RecordingObjectStore::new("https://objects.test"));
        let mailer = Arc::new(RecordingMailer::new());
        let pipeline = Arc::new(ExportPipeline::new(
            Arc::new(InMemoryListStore::new()),
            object_store.clone(),
            Arc::new(directory),
            mailer.clone(),
            Arc::new(FixedTimeProvider::new(1_700_000_000_000)),
        ));
        let worker = ExportWorker::new(queue.clone(), pipeline, 10, max_attempts);
        Harness {
            queue,
            object_store,
            mailer,
            worker,
        }
    }

    #[tokio::test]
    async fn test_successful_job_is_acknowledged() {
        let h = harness(StaticDirectory::new().with_user("u1", "u1@example.com"), 5);
        let id = h
            .queue
            .enqueue(r#"{"listId":"L1","userId":"u1"}"#)
            .await
            .unwrap();

        let processed = h.worker.process_batch().await.unwrap();

        assert_eq!(processed, 1);
        assert_eq!(h.queue.state_of(&id), Some(MessageState::Done));
        assert_eq!(h.mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_poison_message_is_buried() {
        let h = harness(StaticDirectory::new(), 5);
        let id = h.queue.enqueue("{not json").await.unwrap();

        h.worker.process_batch().await.unwrap();

        assert_eq!(h.queue.state_of(&id), Some(MessageState::Dead));
        assert!(h
            .queue
            .failure_reason_of(&id)
            .unwrap()
            .contains("Serialization"));
    }

    #[tokio::test]
    async fn test_blank_user_id_is_buried_not_skipped() {
        let h = harness(StaticDirectory::new(), 5);
        let id = h
            .queue
            .enqueue(r#"{"listId":"L1","userId":"  "}"#)
            .await
            .unwrap();

        h.worker.process_batch().await.unwrap();

        assert_eq!(h.queue.state_of(&id), Some(MessageState::Dead));
    }

    #[tokio::test]
    async fn test_unknown_user_is_buried_with_artifact_published() {
        let h = harness(StaticDirectory::new(), 5);
        let id = h
            .queue
            .enqueue(r#"{"listId":"L1","userId":"u404"}"#)
            .await
            .unwrap();

        h.worker.process_batch().await.unwrap();

        assert_eq!(h.queue.state_of(&id), Some(MessageState::Dead));
        assert_eq!(h.object_store.stored().len(), 1);
        assert!(h.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_releases_for_redelivery() {
        let h = harness(StaticDirectory::new().with_user("u1", "u1@example.com"), 5);
        h.mailer.fail_with("smtp unavailable");
        let id = h
            .queue
            .enqueue(r#"{"listId":"L1","userId":"u1"}"#)
            .await
            .unwrap();

        h.worker.process_batch().await.unwrap();

        assert_eq!(h.queue.state_of(&id), Some(MessageState::Queued));
    }

    #[tokio::test]
    async fn test_retries_exhausted_moves_to_dead_letter() {
        let h = harness(StaticDirectory::new().with_user("u1", "u1@example.com"), 2);
        h.mailer.fail_with("smtp unavailable");
        let id = h
            .queue
            .enqueue(r#"{"listId":"L1","userId":"u1"}"#)
            .await
            .unwrap();

        // attempt 1: released; attempt 2: cap reached, buried
        h.worker.process_batch().await.unwrap();
        assert_eq!(h.queue.state_of(&id), Some(MessageState::Queued));
        h.worker.process_batch().await.unwrap();
        assert_eq!(h.queue.state_of(&id), Some(MessageState::Dead));
        assert!(h
            .queue
            .failure_reason_of(&id)
            .unwrap()
            .contains("retries exhausted"));

        // Every attempt published its own artifact (timestamp-keyed)
        assert_eq!(h.object_store.stored().len(), 2);
    }

    #[tokio::test]
    async fn test_batch_sibling_survives_poison_message() {
        let h = harness(StaticDirectory::new().with_user("u1", "u1@example.com"), 5);
        let poison = h.queue.enqueue("{not json").await.unwrap();
        let good = h
            .queue
            .enqueue(r#"{"listId":"L1","userId":"u1"}"#)
            .await
            .unwrap();

        let processed = h.worker.process_batch().await.unwrap();

        assert_eq!(processed, 2);
        assert_eq!(h.queue.state_of(&poison), Some(MessageState::Dead));
        assert_eq!(h.queue.state_of(&good), Some(MessageState::Done));
        assert_eq!(h.mailer.sent().len(), 1);
    }
}
