//! UI slice configuration
//!
//! Loaded from JSON; every field has a default, and a corrupt file falls back
//! to the defaults rather than failing start-up.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::DEFAULT_WIDESCREEN_WIDTH;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse UI config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for the UI slice and its document side effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiConfig {
    /// Viewport widths above this are widescreen
    pub widescreen_threshold: u32,
    /// Class toggled on the root and body elements
    pub widescreen_class: String,
    /// Element id of the application root
    pub root_element_id: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            widescreen_threshold: DEFAULT_WIDESCREEN_WIDTH,
            widescreen_class: "widescreen".to_string(),
            root_element_id: "root".to_string(),
        }
    }
}

impl UiConfig {
    /// Parses configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Parses configuration, falling back to defaults on error
    pub fn load_safe(bytes: &[u8]) -> Self {
        Self::from_json(bytes).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring unreadable UI config");
            Self::default()
        })
    }
}
