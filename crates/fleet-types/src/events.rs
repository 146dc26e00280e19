//! Placement lifecycle events
//!
//! Every placement carries its own event history. The CLI only cares about a
//! handful of kinds when deciding how to highlight them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single entry in a placement's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementEvent {
    /// What happened
    pub kind: EventKind,

    /// When it happened
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Optional detail from the scheduler or health checker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Event kinds emitted by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Placement assigned to a host
    Scheduled,
    /// Image available on the host
    ImagePulled,
    /// Workload process started
    Started,
    /// Workload process restarted in place
    Restarted,
    /// Health check passed
    HealthCheckPassed,
    /// Health check failed
    HealthCheckFailed,
    /// Interactive SSH session opened
    #[serde(rename = "SSHStarted")]
    SshStarted,
    /// Workload stopped on request
    Stopped,
    /// Workload killed by the host
    Killed,
    /// Placement failed
    Failed,
    /// A kind this client does not know yet
    #[serde(other)]
    Unknown,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Scheduled => "Scheduled",
            EventKind::ImagePulled => "ImagePulled",
            EventKind::Started => "Started",
            EventKind::Restarted => "Restarted",
            EventKind::HealthCheckPassed => "HealthCheckPassed",
            EventKind::HealthCheckFailed => "HealthCheckFailed",
            EventKind::SshStarted => "SSHStarted",
            EventKind::Stopped => "Stopped",
            EventKind::Killed => "Killed",
            EventKind::Failed => "Failed",
            EventKind::Unknown => "Unknown",
        }
    }

    /// Workload came up
    pub fn is_start(&self) -> bool {
        matches!(self, EventKind::Started | EventKind::Restarted)
    }

    /// Workload went down
    pub fn is_stop(&self) -> bool {
        matches!(self, EventKind::Stopped | EventKind::Killed)
    }

    pub fn is_failed_health(&self) -> bool {
        matches!(self, EventKind::HealthCheckFailed)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
