// Export Pipeline
//
// Worker-side stage sequence for one job:
// fetch items -> render CSV -> publish artifact -> resolve email -> notify.
// Stages run in order and the first failure aborts the rest; earlier side
// effects are not rolled back (an artifact may outlive a failed notify,
// which is accepted at-least-once behavior).

use super::csv;
use crate::domain::{ExportArtifact, ExportJob};
use crate::error::Result;
use crate::port::{IdentityDirectory, ListStore, Mailer, ObjectStore, TimeProvider};
use std::sync::Arc;
use tracing::info;

/// Logical prefix under which artifacts are published
pub const REPORTS_PREFIX: &str = "reports";

/// Fixed notification subject
pub const NOTIFICATION_SUBJECT: &str = "Your task list export is ready";

/// Fixed notification body: a single hyperlink to the artifact
fn notification_body(artifact_url: &str) -> String {
    format!(
        "<h1>Task List Export</h1>\
         <p>Hello!</p>\
         <p>Your task list report was generated successfully.</p>\
         <p>You can download it using the link below:</p>\
         <a href=\"{}\">Download CSV</a>\
         <p>Thank you!</p>",
        artifact_url
    )
}

/// Export pipeline with injected collaborators
pub struct ExportPipeline {
    list_store: Arc<dyn ListStore>,
    object_store: Arc<dyn ObjectStore>,
    identity_directory: Arc<dyn IdentityDirectory>,
    mailer: Arc<dyn Mailer>,
    time_provider: Arc<dyn TimeProvider>,
}

impl ExportPipeline {
    pub fn new(
        list_store: Arc<dyn ListStore>,
        object_store: Arc<dyn ObjectStore>,
        identity_directory: Arc<dyn IdentityDirectory>,
        mailer: Arc<dyn Mailer>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            list_store,
            object_store,
            identity_directory,
            mailer,
            time_provider,
        }
    }

    /// Process one export job through all stages; returns the published
    /// artifact.
    ///
    /// An empty item set is valid and produces a header-only CSV. The
    /// artifact key embeds the processing timestamp, so a redelivered job
    /// publishes a fresh artifact rather than overwriting a prior attempt's.
    pub async fn process(&self, job: &ExportJob) -> Result<ExportArtifact> {
        let items = self.list_store.query_items(&job.list_id).await?;
        info!(list_id = %job.list_id, item_count = items.len(), "Items fetched");

        let content = csv::render(&items);

        let key = format!(
            "{}/export-{}-{}.csv",
            REPORTS_PREFIX,
            job.list_id,
            self.time_provider.now_millis()
        );
        let url = self
            .object_store
            .put(&key, content.as_bytes(), csv::CSV_CONTENT_TYPE)
            .await?;
        let artifact = ExportArtifact { key, url };
        info!(list_id = %job.list_id, key = %artifact.key, "Artifact published");

        let identity = self.identity_directory.lookup(&job.user_id).await?;

        self.mailer
            .send(
                &identity.email,
                NOTIFICATION_SUBJECT,
                &notification_body(&artifact.url),
            )
            .await?;
        info!(list_id = %job.list_id, to = %identity.email, "Notification sent");

        Ok(artifact)
    }
}
