//! Strongly-typed identifiers for fleet entities
//!
//! The service hands out opaque string ids; they are wrapped in newtype
//! structs so deployment and placement ids cannot be mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the abbreviated id shown in lists
pub const SHORT_ID_LEN: usize = 8;

fn shorten(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Unique identifier for a deployment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(String);

impl DeploymentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in choosers and tables
    pub fn short(&self) -> &str {
        shorten(&self.0)
    }

    /// Case-insensitive prefix match
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.len() >= prefix.len()
            && self.0.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a placement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementId(String);

impl PlacementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        shorten(&self.0)
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_id_prefix() {
        let id = DeploymentId::new("a1b2c3d4e5f6");
        assert!(id.has_prefix("a1b2"));
        assert!(id.has_prefix("A1B2"));
        assert!(id.has_prefix("a1b2c3d4e5f6"));
        assert!(!id.has_prefix("a1b2c3d4e5f6a"));
        assert!(!id.has_prefix("b1"));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(DeploymentId::new("0123456789abcdef").short(), "01234567");
        assert_eq!(PlacementId::new("abc").short(), "abc");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = DeploymentId::new("dep-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"dep-1\"");
    }
}
