// Export Job Domain Model

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Export job payload carried by the queue.
///
/// Wire format is JSON: `{"listId": "...", "userId": "..."}`. The job has no
/// identity beyond its queue message and is never stored elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJob {
    pub list_id: String,
    pub user_id: String,
}

/// A published export artifact.
///
/// The key embeds the list id and the processing timestamp, never a content
/// hash: redeliveries of one job publish distinct artifacts. Once written
/// the object store owns it; the pipeline keeps no reference to prior
/// artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub key: String,
    pub url: String,
}

/// Terminal outcome of processing one dequeued message.
///
/// `Completed` acknowledges the message. `Retry` releases it for redelivery
/// (the attempt cap buries it instead once exhausted). `Dead` buries it
/// immediately: retrying the same input can never succeed.
#[derive(Debug)]
pub enum JobOutcome {
    Completed,
    Retry(AppError),
    Dead(AppError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_field_names() {
        let job = ExportJob {
            list_id: "L1".to_string(),
            user_id: "u1".to_string(),
        };

        let json = serde_json::to_string(&job).expect("serialize");
        assert_eq!(json, r#"{"listId":"L1","userId":"u1"}"#);

        let back: ExportJob = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, job);
    }

    #[test]
    fn test_malformed_payload_is_rejected() {
        assert!(serde_json::from_str::<ExportJob>("{not json").is_err());
        assert!(serde_json::from_str::<ExportJob>(r#"{"listId":"L1"}"#).is_err());
    }
}
