//! State type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Per-user backend context, resolved after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.into(),
            created_at: Utc::now(),
        }
    }
}

/// Coarse application readiness gating navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Splash is up and one-time initialization is running
    Starting,
    /// No session
    LoggedOut,
    /// Session present, workspace not resolved yet
    Loading,
    /// Session and workspace present
    Ready,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Starting,
        Phase::LoggedOut,
        Phase::Loading,
        Phase::Ready,
    ];

    pub fn is_ready(self) -> bool {
        matches!(self, Phase::Ready)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Starting => "starting",
            Phase::LoggedOut => "logged_out",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "starting" => Ok(Phase::Starting),
            "logged_out" | "loggedout" => Ok(Phase::LoggedOut),
            "loading" => Ok(Phase::Loading),
            "ready" => Ok(Phase::Ready),
            other => Err(format!("unknown phase '{other}'")),
        }
    }
}

/// What lifecycle observers receive on every published change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleSnapshot {
    pub phase: Phase,
    pub workspace: Option<Workspace>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_parse_roundtrip() {
        for phase in Phase::ALL {
            assert_eq!(phase.as_str().parse::<Phase>().unwrap(), phase);
        }
        assert_eq!("Logged-Out".parse::<Phase>().unwrap(), Phase::LoggedOut);
        assert!("paused".parse::<Phase>().is_err());
    }

    #[test]
    fn test_identity_label_prefers_display_name() {
        assert_eq!(Identity::new("u1").label(), "u1");
        assert_eq!(Identity::new("u1").with_display_name("Ada").label(), "Ada");
    }
}
