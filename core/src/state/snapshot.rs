//! Point-in-time view of the whole shell, for status output and diagnostics.

use super::types::{Identity, Phase, Workspace};
use crate::settings::ThemeMode;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub captured_at: DateTime<Utc>,
    pub phase: Phase,
    pub identity: Option<Identity>,
    pub workspace: Option<Workspace>,
    /// Rendered location of the current screen
    pub location: String,
    /// Set when the current screen is the error route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub theme: ThemeMode,
}

impl StateSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize snapshot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = StateSnapshot {
            captured_at: Utc::now(),
            phase: Phase::LoggedOut,
            identity: None,
            workspace: None,
            location: "/login?from=%2Fsettings".to_string(),
            error: None,
            theme: ThemeMode::Dark,
        };

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["phase"], "logged_out");
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["location"], "/login?from=%2Fsettings");
        assert!(value.get("error").is_none());
    }
}
