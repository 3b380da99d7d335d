// Mailer Port (Interface)

use crate::error::Result;
use async_trait::async_trait;

/// Notification send interface.
///
/// A successful return means the downstream service accepted the message,
/// not that the recipient received it. No delivery receipt tracking.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct OutboundEmail {
        pub to: String,
        pub subject: String,
        pub html_body: String,
    }

    /// Records sends; can be switched into a failing mode.
    pub struct RecordingMailer {
        sent: Mutex<Vec<OutboundEmail>>,
        fail_with: Mutex<Option<String>>,
    }

    impl RecordingMailer {
        pub fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_with: Mutex::new(None),
            }
        }

        /// Make subsequent sends fail with a mail error
        pub fn fail_with(&self, message: impl Into<String>) {
            *self.fail_with.lock().unwrap() = Some(message.into());
        }

        pub fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Default for RecordingMailer {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
            if let Some(msg) = self.fail_with.lock().unwrap().clone() {
                return Err(AppError::Mail(msg));
            }
            self.sent.lock().unwrap().push(OutboundEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
            });
            Ok(())
        }
    }
}
