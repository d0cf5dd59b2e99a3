use serde::{Deserialize, Serialize};

use super::job_status::JobStatus;

/// Status snapshot returned by `GET /status/{session_id}`.
///
/// Poll responses are eventually-consistent snapshots: any field may be
/// absent, and the whole snapshot may lag behind what the push channel has
/// already delivered. The coordinator treats them as idempotently mergeable,
/// never as an ordering authority.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_units: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_units: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_units: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_snapshot_roundtrip() {
        let raw = r#"{
            "session_id": "s1",
            "status": "processing",
            "total_units": 10,
            "completed_units": 4,
            "ready_units": 2,
            "percent_complete": 40,
            "updated_at": "2025-06-01T12:00:00Z"
        }"#;
        let parsed: StatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.session_id, "s1");
        assert_eq!(parsed.status, Some(JobStatus::Processing));
        assert_eq!(parsed.completed_units, Some(4));
    }

    #[test]
    fn test_sparse_snapshot() {
        let parsed: StatusResponse =
            serde_json::from_str(r#"{ "session_id": "s2" }"#).unwrap();
        assert!(parsed.status.is_none());
        assert!(parsed.total_units.is_none());
        assert!(parsed.updated_at.is_none());
    }
}
