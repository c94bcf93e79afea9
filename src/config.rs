//! Session configuration.
//!
//! A [`SessionConfig`] can be built in code, through
//! [`GameSessionBuilder`](crate::GameSessionBuilder), or loaded from JSON.
//! Missing fields take their defaults:
//!
//! ```json
//! {
//!   "name": "1856",
//!   "auto_reopen": true,
//!   "trace_changes": true,
//!   "strict_state_ids": true
//! }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`GameSession`](crate::GameSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session name used in log output
    pub name: String,
    /// Open a fresh transaction right after each commit
    pub auto_reopen: bool,
    /// Log every closed, undone and redone action through `tracing`
    pub trace_changes: bool,
    /// Reject a second cell with the same owner and id
    pub strict_state_ids: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "game".to_string(),
            auto_reopen: false,
            trace_changes: true,
            strict_state_ids: true,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Render this configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("session name must not be empty".to_string()));
        }
        Ok(())
    }
}
