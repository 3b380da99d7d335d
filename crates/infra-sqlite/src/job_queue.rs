// SQLite JobQueue Implementation
//
// Durable at-least-once queue: receive() atomically leases deliverable
// messages (queued, or leased past their expiry) and bumps the attempt
// counter, so a consumer that dies without settling simply loses its lease
// and the message comes back.

use crate::error_map::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use tasklist_core::error::Result;
use tasklist_core::port::{IdProvider, JobQueue, MessageState, QueuedMessage, TimeProvider};
use tracing::{debug, warn};

/// Queue tuning
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Lease duration before an unacknowledged message is redelivered
    pub visibility_timeout_ms: i64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            visibility_timeout_ms:
                tasklist_core::application::worker::constants::DEFAULT_VISIBILITY_TIMEOUT_MS,
        }
    }
}

pub struct SqliteJobQueue {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
    config: QueueConfig,
}

impl SqliteJobQueue {
    pub fn new(
        pool: SqlitePool,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
        config: QueueConfig,
    ) -> Self {
        Self {
            pool,
            time_provider,
            id_provider,
            config,
        }
    }
}

#[async_trait]
impl JobQueue for SqliteJobQueue {
    async fn enqueue(&self, body: &str) -> Result<String> {
        let id = self.id_provider.generate_id();
        let now = self.time_provider.now_millis();

        sqlx::query(
            "INSERT INTO export_queue (id, body, state, attempts, enqueued_at)
             VALUES (?, ?, 'QUEUED', 0, ?)",
        )
        .bind(&id)
        .bind(body)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(message_id = %id, "Message enqueued");
        Ok(id)
    }

    async fn receive(&self, max: usize) -> Result<Vec<QueuedMessage>> {
        let now = self.time_provider.now_millis();
        let lease_expires_at = now + self.config.visibility_timeout_ms;

        // Single atomic statement: expired leases count as deliverable again
        let rows: Vec<(String, String, i32)> = sqlx::query_as(
            "UPDATE export_queue
             SET state = 'LEASED', attempts = attempts + 1, lease_expires_at = ?
             WHERE id IN (
                 SELECT id FROM export_queue
                 WHERE state = 'QUEUED'
                    OR (state = 'LEASED' AND lease_expires_at <= ?)
                 ORDER BY enqueued_at
                 LIMIT ?
             )
             RETURNING id, body, attempts",
        )
        .bind(lease_expires_at)
        .bind(now)
        .bind(max as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, body, attempts)| QueuedMessage { id, body, attempts })
            .collect())
    }

    async fn ack(&self, message_id: &str) -> Result<()> {
        let now = self.time_provider.now_millis();
        let result = sqlx::query(
            "UPDATE export_queue
             SET state = 'DONE', finished_at = ?, lease_expires_at = NULL
             WHERE id = ? AND state = 'LEASED'",
        )
        .bind(now)
        .bind(message_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            // Lease already lost; the message will be redelivered elsewhere
            warn!(message_id = %message_id, "Acknowledge found no leased message");
        }
        Ok(())
    }

    async fn release(&self, message_id: &str) -> Result<()> {
        sqlx::query(
            "UPDATE export_queue
             SET state = 'QUEUED', lease_expires_at = NULL
             WHERE id = ? AND state = 'LEASED'",
        )
        .bind(message_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn bury(&self, message_id: &str, reason: &str) -> Result<()> {
        let now = self.time_provider.now_millis();
        sqlx::query(
            "UPDATE export_queue
             SET state = 'DEAD', finished_at = ?, lease_expires_at = NULL, failure_reason = ?
             WHERE id = ?",
        )
        .bind(now)
        .bind(reason)
        .bind(message_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn count_by_state(&self, state: MessageState) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM export_queue WHERE state = ?")
            .bind(state.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn purge_finished(&self, retention_ms: i64) -> Result<u64> {
        let cutoff = self.time_provider.now_millis() - retention_ms;
        let result = sqlx::query(
            "DELETE FROM export_queue
             WHERE state IN ('DONE', 'DEAD')
               AND finished_at IS NOT NULL
               AND finished_at < ?",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use tasklist_core::port::id_provider::mocks::SequentialIdProvider;
    use tasklist_core::port::time_provider::mocks::FixedTimeProvider;

    const VISIBILITY_MS: i64 = 30_000;

    async fn queue() -> (SqliteJobQueue, Arc<FixedTimeProvider>) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let clock = Arc::new(FixedTimeProvider::new(1_000_000));
        let queue = SqliteJobQueue::new(
            pool,
            clock.clone(),
            Arc::new(SequentialIdProvider::new()),
            QueueConfig {
                visibility_timeout_ms: VISIBILITY_MS,
            },
        );
        (queue, clock)
    }

    #[tokio::test]
    async fn test_enqueue_receive_ack_cycle() {
        let (queue, _) = queue().await;
        let id = queue.enqueue("payload-1").await.unwrap();

        let batch = queue.receive(10).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, id);
        assert_eq!(batch[0].body, "payload-1");
        assert_eq!(batch[0].attempts, 1);

        queue.ack(&id).await.unwrap();
        assert_eq!(queue.count_by_state(MessageState::Done).await.unwrap(), 1);
        assert!(queue.receive(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_leased_message_is_invisible_until_expiry() {
        let (queue, clock) = queue().await;
        queue.enqueue("payload-1").await.unwrap();

        assert_eq!(queue.receive(10).await.unwrap().len(), 1);
        // Still leased, nothing deliverable
        assert!(queue.receive(10).await.unwrap().is_empty());

        // Lease expires: the same message is redelivered with a higher count
        clock.advance_millis(VISIBILITY_MS + 1);
        let redelivered = queue.receive(10).await.unwrap();
        assert_eq!(redelivered.len(), 1);
        assert_eq!(redelivered[0].attempts, 2);
    }

    #[tokio::test]
    async fn test_release_makes_message_deliverable_immediately() {
        let (queue, _) = queue().await;
        let id = queue.enqueue("payload-1").await.unwrap();

        queue.receive(10).await.unwrap();
        queue.release(&id).await.unwrap();

        let redelivered = queue.receive(10).await.unwrap();
        assert_eq!(redelivered.len(), 1);
        assert_eq!(redelivered[0].attempts, 2);
    }

    #[tokio::test]
    async fn test_buried_message_is_never_redelivered() {
        let (queue, clock) = queue().await;
        let id = queue.enqueue("payload-1").await.unwrap();

        queue.receive(10).await.unwrap();
        queue.bury(&id, "poison payload").await.unwrap();

        clock.advance_millis(VISIBILITY_MS * 10);
        assert!(queue.receive(10).await.unwrap().is_empty());
        assert_eq!(queue.count_by_state(MessageState::Dead).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_receive_respects_batch_limit_and_fifo() {
        let (queue, clock) = queue().await;
        let first = queue.enqueue("a").await.unwrap();
        clock.advance_millis(10);
        queue.enqueue("b").await.unwrap();
        clock.advance_millis(10);
        queue.enqueue("c").await.unwrap();

        let batch = queue.receive(1).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, first);
        assert_eq!(queue.count_by_state(MessageState::Queued).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_purge_finished_respects_retention() {
        let (queue, clock) = queue().await;
        let id = queue.enqueue("a").await.unwrap();
        queue.receive(10).await.unwrap();
        queue.ack(&id).await.unwrap();

        // Within retention: kept
        assert_eq!(queue.purge_finished(60_000).await.unwrap(), 0);

        clock.advance_millis(120_000);
        assert_eq!(queue.purge_finished(60_000).await.unwrap(), 1);
        assert_eq!(queue.count_by_state(MessageState::Done).await.unwrap(), 0);
    }
}
