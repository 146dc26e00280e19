//! Placement types
//!
//! A Placement is a scheduled instantiation of a deployment on a host.

use crate::{DeploymentId, PlacementEvent, PlacementId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A deployment scheduled onto infrastructure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Unique placement identifier
    pub id: PlacementId,

    /// Owning deployment
    pub deployment_id: DeploymentId,

    /// Location the placement runs in
    pub location: String,

    /// Host the placement was scheduled on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Current status
    pub status: PlacementStatus,

    /// Event history as returned by the service
    #[serde(default)]
    pub events: Vec<PlacementEvent>,

    /// Created timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,

}

impl Placement {
    /// Events ordered by timestamp; ties keep service order
    pub fn chronological_events(&self) -> Vec<&PlacementEvent> {
        let mut events: Vec<&PlacementEvent> = self.events.iter().collect();
        events.sort_by_key(|e| e.timestamp);
        events
    }
}

/// Placement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementStatus {
    Scheduled,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
    #[serde(other)]
    Unknown,
}

impl PlacementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementStatus::Scheduled => "scheduled",
            PlacementStatus::Starting => "starting",
            PlacementStatus::Running => "running",
            PlacementStatus::Stopping => "stopping",
            PlacementStatus::Stopped => "stopped",
            PlacementStatus::Failed => "failed",
            PlacementStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;
    use serde_json::json;

    #[test]
    fn test_chronological_events_sorts_by_timestamp() {
        let placement: Placement = serde_json::from_value(json!({
            "id": "p-1",
            "deployment_id": "d-1",
            "location": "ams",
            "status": "running",
            "created_at": "2024-05-01T10:00:00Z",
            "events": [
                { "kind": "Started", "timestamp": "2024-05-01T10:00:30Z" },
                { "kind": "Scheduled", "timestamp": "2024-05-01T10:00:00Z" },
                { "kind": "ImagePulled", "timestamp": "2024-05-01T10:00:10Z" },
                { "kind": "HealthCheckPassed", "timestamp": "2024-05-01T10:00:30Z" }
            ]
        }))
        .unwrap();

        let kinds: Vec<EventKind> = placement
            .chronological_events()
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Scheduled,
                EventKind::ImagePulled,
                EventKind::Started,
                EventKind::HealthCheckPassed,
            ]
        );
    }

    #[test]
    fn test_placement_without_events() {
        let placement: Placement = serde_json::from_value(json!({
            "id": "p-2",
            "deployment_id": "d-1",
            "location": "fra",
            "status": "scheduled",
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert!(placement.events.is_empty());
        assert!(placement.host.is_none());
        assert_eq!(placement.status, PlacementStatus::Scheduled);
    }

    #[test]
    fn test_unknown_status_and_kind_do_not_fail_decoding() {
        let placement: Placement = serde_json::from_value(json!({
            "id": "p-3",
            "deployment_id": "d-1",
            "location": "fra",
            "status": "migrating",
            "created_at": "2024-05-01T10:00:00Z",
            "events": [{ "kind": "Migrated", "timestamp": "2024-05-01T10:00:00Z" }]
        }))
        .unwrap();
        assert_eq!(placement.status, PlacementStatus::Unknown);
        assert_eq!(placement.events[0].kind, EventKind::Unknown);
    }
}
