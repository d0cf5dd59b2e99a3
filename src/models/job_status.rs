use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a document-processing job.
///
/// A job moves through the pipeline stages in order and ends in exactly one
/// of the terminal states. Once terminal, the session never changes status
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// No processing requested yet.
    #[default]
    Idle,

    /// Source documents are being uploaded.
    Uploading,

    /// The pipeline accepted the job and is running.
    Processing,

    /// Content extraction stage.
    Extracting,

    /// Analysis stage.
    Analyzing,

    /// All stages finished successfully. Terminal.
    Completed,

    /// The pipeline failed. Terminal.
    Error,

    /// The job was cancelled. Terminal.
    Cancelled,
}

impl JobStatus {
    /// Whether this status ends the session. Terminal sessions accept no
    /// further mutation from any channel.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Cancelled)
    }

    /// Pipeline progression rank, used to keep stale poll snapshots from
    /// moving a session's status backwards. All terminal states share the
    /// highest rank.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Uploading => 1,
            Self::Processing => 2,
            Self::Extracting => 3,
            Self::Analyzing => 4,
            Self::Completed | Self::Error | Self::Cancelled => 5,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Extracting => "extracting",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{}", name)
    }
}
