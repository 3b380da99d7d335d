// Job Queue Port (Interface)
//
// Durable at-least-once delivery channel for export jobs. Consumers lease
// messages; a lease that expires without acknowledgment makes the message
// deliverable again. Messages that can never succeed are buried in the
// dead-letter state instead of redelivering forever.

use crate::error::Result;
use async_trait::async_trait;

/// Message lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    Queued,
    Leased,
    Done,
    Dead,
}

impl std::fmt::Display for MessageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageState::Queued => write!(f, "QUEUED"),
            MessageState::Leased => write!(f, "LEASED"),
            MessageState::Done => write!(f, "DONE"),
            MessageState::Dead => write!(f, "DEAD"),
        }
    }
}

/// One leased delivery of a queue message.
///
/// `attempts` counts deliveries including this one; redelivery of the same
/// message yields a higher count.
#[derive(Debug, Clone)]
pub struct QueuedMessage {
    pub id: String,
    pub body: String,
    pub attempts: i32,
}

/// Queue interface for export jobs
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Append a message; returns its id
    async fn enqueue(&self, body: &str) -> Result<String>;

    /// Lease up to `max` deliverable messages (queued, or leased with an
    /// expired lease), bumping their attempt counters
    async fn receive(&self, max: usize) -> Result<Vec<QueuedMessage>>;

    /// Acknowledge successful processing; the message is finished
    async fn ack(&self, message_id: &str) -> Result<()>;

    /// Return a leased message to the queue for immediate redelivery
    async fn release(&self, message_id: &str) -> Result<()>;

    /// Move a message to the dead-letter state, recording why
    async fn bury(&self, message_id: &str, reason: &str) -> Result<()>;

    /// Count messages currently in the given state
    async fn count_by_state(&self, state: MessageState) -> Result<i64>;

    /// Delete finished (done/dead) messages older than the retention window
    async fn purge_finished(&self, retention_ms: i64) -> Result<u64>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    struct StoredMessage {
        id: String,
        body: String,
        state: MessageState,
        attempts: i32,
        failure_reason: Option<String>,
    }

    /// In-memory queue with lease semantics (no clock: a lease only ends via
    /// ack/release/bury). Exposes inspection helpers for assertions.
    pub struct InMemoryJobQueue {
        inner: Mutex<Vec<StoredMessage>>,
        counter: Mutex<u64>,
        fail_enqueue: Mutex<Option<String>>,
    }

    impl InMemoryJobQueue {
        pub fn new() -> Self {
            Self {
                inner: Mutex::new(Vec::new()),
                counter: Mutex::new(0),
                fail_enqueue: Mutex::new(None),
            }
        }

        /// Make the next enqueue calls fail with a queue error
        pub fn fail_enqueue_with(&self, message: impl Into<String>) {
            *self.fail_enqueue.lock().unwrap() = Some(message.into());
        }

        pub fn message_count(&self) -> usize {
            self.inner.lock().unwrap().len()
        }

        pub fn bodies(&self) -> Vec<String> {
            self.inner
                .lock()
                .unwrap()
                .iter()
                .map(|m| m.body.clone())
                .collect()
        }

        pub fn state_of(&self, message_id: &str) -> Option<MessageState> {
            self.inner
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.id == message_id)
                .map(|m| m.state)
        }

        pub fn failure_reason_of(&self, message_id: &str) -> Option<String> {
            self.inner
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.id == message_id)
                .and_then(|m| m.failure_reason.clone())
        }
    }

    impl Default for InMemoryJobQueue {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl JobQueue for InMemoryJobQueue {
        async fn enqueue(&self, body: &str) -> Result<String> {
            if let Some(msg) = self.fail_enqueue.lock().unwrap().clone() {
                return Err(AppError::Queue(msg));
            }
            let mut counter = self.counter.lock().unwrap();
            *counter += 1;
            let id = format!("msg-{}", *counter);
            self.inner.lock().unwrap().push(StoredMessage {
                id: id.clone(),
                body: body.to_string(),
                state: MessageState::Queued,
                attempts: 0,
                failure_reason: None,
            });
            Ok(id)
        }

        async fn receive(&self, max: usize) -> Result<Vec<QueuedMessage>> {
            let mut inner = self.inner.lock().unwrap();
            let mut leased = Vec::new();
            for message in inner.iter_mut() {
                if leased.len() >= max {
                    break;
                }
                if message.state == MessageState::Queued {
                    message.state = MessageState::Leased;
                    message.attempts += 1;
                    leased.push(QueuedMessage {
                        id: message.id.clone(),
                        body: message.body.clone(),
                        attempts: message.attempts,
                    });
                }
            }
            Ok(leased)
        }

        async fn ack(&self, message_id: &str) -> Result<()> {
            self.transition(message_id, MessageState::Done, None)
        }

        async fn release(&self, message_id: &str) -> Result<()> {
            self.transition(message_id, MessageState::Queued, None)
        }

        async fn bury(&self, message_id: &str, reason: &str) -> Result<()> {
            self.transition(message_id, MessageState::Dead, Some(reason.to_string()))
        }

        async fn count_by_state(&self, state: MessageState) -> Result<i64> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.state == state)
                .count() as i64)
        }

        async fn purge_finished(&self, _retention_ms: i64) -> Result<u64> {
            let mut inner = self.inner.lock().unwrap();
            let before = inner.len();
            inner.retain(|m| !matches!(m.state, MessageState::Done | MessageState::Dead));
            Ok((before - inner.len()) as u64)
        }
    }

    impl InMemoryJobQueue {
        fn transition(
            &self,
            message_id: &str,
            state: MessageState,
            failure_reason: Option<String>,
        ) -> Result<()> {
            let mut inner = self.inner.lock().unwrap();
            let message = inner
                .iter_mut()
                .find(|m| m.id == message_id)
                .ok_or_else(|| AppError::Queue(format!("unknown message {}", message_id)))?;
            message.state = state;
            if failure_reason.is_some() {
                message.failure_reason = failure_reason;
            }
            Ok(())
        }
    }
}
