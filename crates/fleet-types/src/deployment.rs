//! Deployment types
//!
//! A Deployment is the unit the service lists and filters. Placements hang
//! off a deployment and are fetched separately.

use crate::{DeploymentId, Record};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// A deployment tracked by the management service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    /// Unique deployment identifier
    pub id: DeploymentId,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Container image reference
    pub image: String,

    /// Location (region) the deployment is pinned to
    pub location: String,

    /// Current lifecycle state
    pub state: DeploymentState,

    /// Public IPv4 address, once assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Ipv4Addr>,

    /// Created timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Last updated timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Deployment {
    /// Name if set, otherwise the image
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.image)
    }
}

/// Deployment lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    /// Accepted, not yet scheduled
    Pending,
    /// Placements are starting
    Starting,
    /// Serving
    Running,
    /// Placements are shutting down
    Stopping,
    /// Stopped by request
    Stopped,
    /// Could not be brought up
    Failed,
    /// Removed; kept for history
    Destroyed,
    /// A state this client does not know yet
    #[serde(other)]
    #[cfg_attr(feature = "cli", value(skip))]
    Unknown,
}

impl DeploymentState {
    /// Wire name, also used as the query parameter value
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentState::Pending => "pending",
            DeploymentState::Starting => "starting",
            DeploymentState::Running => "running",
            DeploymentState::Stopping => "stopping",
            DeploymentState::Stopped => "stopped",
            DeploymentState::Failed => "failed",
            DeploymentState::Destroyed => "destroyed",
            DeploymentState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of the paginated deployment listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentPage {
    /// Deployments on this page
    pub deployments: Vec<Record<Deployment>>,

    /// Opaque cursor for the next page, absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample() -> Value {
        json!({
            "id": "d3adb33f0001",
            "name": "web",
            "image": "registry.example.com/web:1.4",
            "location": "ams",
            "state": "running",
            "ipv4": "203.0.113.7",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:05:00Z",
            "vcpus": 2,
            "labels": { "team": "edge" }
        })
    }

    #[test]
    fn test_deployment_deserializes() {
        let deployment: Deployment = serde_json::from_value(sample()).unwrap();
        assert_eq!(deployment.id.as_str(), "d3adb33f0001");
        assert_eq!(deployment.state, DeploymentState::Running);
        assert_eq!(deployment.ipv4, Some(Ipv4Addr::new(203, 0, 113, 7)));
        assert_eq!(deployment.label(), "web");
    }

    #[test]
    fn test_unknown_state_is_tolerated() {
        let mut value = sample();
        value["state"] = json!("hibernating");
        let deployment: Deployment = serde_json::from_value(value).unwrap();
        assert_eq!(deployment.state, DeploymentState::Unknown);
        assert_eq!(deployment.state.to_string(), "unknown");
    }

    #[test]
    fn test_page_keeps_raw_records() {
        let page: DeploymentPage = serde_json::from_value(json!({
            "deployments": [sample()],
            "next_cursor": "c-2"
        }))
        .unwrap();
        assert_eq!(page.deployments[0].id.as_str(), "d3adb33f0001");
        assert_eq!(page.deployments[0].raw(), &sample());
        assert_eq!(page.next_cursor.as_deref(), Some("c-2"));
    }

    #[test]
    fn test_label_falls_back_to_image() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("name");
        let deployment: Deployment = serde_json::from_value(value).unwrap();
        assert_eq!(deployment.label(), "registry.example.com/web:1.4");
    }

    #[test]
    fn test_state_wire_names() {
        for state in [
            DeploymentState::Pending,
            DeploymentState::Starting,
            DeploymentState::Running,
            DeploymentState::Stopping,
            DeploymentState::Stopped,
            DeploymentState::Failed,
            DeploymentState::Destroyed,
        ] {
            let encoded = serde_json::to_value(state).unwrap();
            assert_eq!(encoded, json!(state.as_str()));
        }
    }

    #[test]
    fn test_page_without_cursor() {
        let page: DeploymentPage = serde_json::from_value(json!({ "deployments": [] })).unwrap();
        assert!(page.deployments.is_empty());
        assert!(page.next_cursor.is_none());
    }
}
