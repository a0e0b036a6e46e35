//! Naming convention configuration.
//!
//! A convention describes how a foreign API spells its declarations: the
//! library-wide name prefix and the verb markers used for accessors and
//! sibling traversal.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// The naming convention of one foreign API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConvention {
    /// Library-wide declaration prefix (e.g. "LLVM").
    pub prefix: String,
    /// Marker introducing a read accessor.
    #[serde(default = "default_getter_marker")]
    pub getter_marker: String,
    /// Marker introducing a write accessor.
    #[serde(default = "default_setter_marker")]
    pub setter_marker: String,
    /// Marker that, directly after the getter marker, introduces a
    /// next-sibling traversal step.
    #[serde(default = "default_next_marker")]
    pub next_marker: String,
}

fn default_getter_marker() -> String {
    "Get".to_string()
}

fn default_setter_marker() -> String {
    "Set".to_string()
}

fn default_next_marker() -> String {
    "Next".to_string()
}

impl NamingConvention {
    /// Convention with the standard Get/Set/Next markers and the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        NamingConvention {
            prefix: prefix.into(),
            getter_marker: default_getter_marker(),
            setter_marker: default_setter_marker(),
            next_marker: default_next_marker(),
        }
    }

    /// Reject marker configurations that would match everything.
    pub fn validate(&self) -> Result<()> {
        if self.getter_marker.is_empty() || self.setter_marker.is_empty() || self.next_marker.is_empty() {
            return Err(ModelError::InvalidManifest {
                detail: "naming-convention markers must be non-empty".to_string(),
            });
        }
        Ok(())
    }
}
