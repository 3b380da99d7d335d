// Outbox Mailer Implementation
//
// Writes one message file per send into an outbox directory that a relay
// picks up. "Sent" means the file was durably written, nothing more.

use async_trait::async_trait;
use std::path::PathBuf;
use tasklist_core::error::{AppError, Result};
use tasklist_core::port::Mailer;
use tracing::info;

pub struct OutboxMailer {
    outbox_dir: PathBuf,
    sender: String,
}

impl OutboxMailer {
    pub fn new(outbox_dir: impl Into<PathBuf>, sender: impl Into<String>) -> Self {
        Self {
            outbox_dir: outbox_dir.into(),
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.outbox_dir)
            .await
            .map_err(|e| {
                AppError::Mail(format!(
                    "cannot create outbox {}: {}",
                    self.outbox_dir.display(),
                    e
                ))
            })?;

        let filename = format!(
            "{}-{}.eml",
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4()
        );
        let path = self.outbox_dir.join(&filename);

        let message = format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nContent-Type: text/html; charset=utf-8\r\n\r\n{}\r\n",
            self.sender, to, subject, html_body
        );

        tokio::fs::write(&path, message)
            .await
            .map_err(|e| AppError::Mail(format!("cannot write {}: {}", path.display(), e)))?;

        info!(to = %to, subject = %subject, outbox_file = %filename, "Notification queued in outbox");
        Ok(())
    }
}
