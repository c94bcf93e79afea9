//! Action descriptors
//!
//! An [`ActionDescriptor`] tells history and UI code which player action
//! produced a change set ("PRR buys 10% of B&O", "CGR discards a 4-train").
//! The engine stores it verbatim on close and never interprets it.
//!
//! Descriptors are serializable so that an external replay or network layer
//! can ship the *actions* of a game rather than its internal change records.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Opaque description of the player action behind a change set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Action type, e.g. `"BuyCertificate"`
    pub name: String,
    /// Player or company performing the action, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Rule-specific parameters
    #[serde(default)]
    pub payload: JsonValue,
    /// Creation timestamp (milliseconds since epoch)
    pub created_at: i64,
}

impl ActionDescriptor {
    /// Create a descriptor with no actor and an empty payload
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actor: None,
            payload: JsonValue::Null,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Set the acting player or company
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Attach rule-specific parameters
    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload = payload;
        self
    }

    /// Short human-readable label, e.g. `"BuyCertificate by Alice"`
    pub fn label(&self) -> String {
        match &self.actor {
            Some(actor) => format!("{} by {}", self.name, actor),
            None => self.name.clone(),
        }
    }
}

impl std::fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
