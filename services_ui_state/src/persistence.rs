//! UI state persistence
//!
//! Only `sidebar`, `theme` and `noteSidebar` survive a reload. Notifications,
//! modal and palette state are session-only and never written out.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::UiConfig;
use crate::state::{check_widescreen, Theme, UiState};
use crate::window::WindowHost;

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize UI state: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    #[error("Failed to deserialize UI state: {0}")]
    DeserializationFailed(#[source] serde_json::Error),
}

/// The persisted projection of `UiState`
///
/// Unknown fields are ignored on load. Absent, null or malformed fields take
/// their defaults without affecting the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedUiState {
    #[serde(deserialize_with = "lenient")]
    pub sidebar: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub theme: Option<Theme>,
    #[serde(deserialize_with = "lenient")]
    pub note_sidebar: bool,
}

/// Decodes one field, falling back to its default when the value has the
/// wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Projects a state onto its persisted fields
pub fn to_persisted(state: &UiState) -> PersistedUiState {
    PersistedUiState {
        sidebar: state.sidebar.clone(),
        theme: Some(state.theme),
        note_sidebar: state.note_sidebar,
    }
}

/// Rebuilds a state from a snapshot
///
/// Starts from defaults, overlays the persisted fields, falls back to the
/// window's colour-scheme preference when no theme was saved, and computes
/// `widescreen` from the live viewport.
pub fn from_persisted(
    snapshot: &PersistedUiState,
    window: &dyn WindowHost,
    config: &UiConfig,
) -> UiState {
    UiState {
        sidebar: snapshot.sidebar.clone(),
        theme: snapshot
            .theme
            .unwrap_or_else(|| Theme::from_preference(window.prefers_dark_scheme())),
        note_sidebar: snapshot.note_sidebar,
        widescreen: check_widescreen(window.viewport().width, config.widescreen_threshold),
        ..UiState::default()
    }
}

/// Serializes a snapshot to JSON bytes
pub fn serialize_snapshot(snapshot: &PersistedUiState) -> PersistenceResult<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot).map_err(PersistenceError::SerializationFailed)
}

/// Deserializes a snapshot from JSON bytes
pub fn deserialize_snapshot(bytes: &[u8]) -> PersistenceResult<PersistedUiState> {
    serde_json::from_slice(bytes).map_err(PersistenceError::DeserializationFailed)
}

/// Loads a snapshot, falling back to an empty one on error
pub fn load_snapshot_safe(bytes: &[u8]) -> PersistedUiState {
    deserialize_snapshot(bytes).unwrap_or_else(|err| {
        tracing::warn!(%err, "discarding unreadable UI snapshot");
        PersistedUiState::default()
    })
}
