//! Developer tooling hooks
//!
//! Outside integration runs the manager publishes its editors here for manual
//! inspection, and can load a developer-tools overlay onto the primary editor.

use serde::Deserialize;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Query flag that requests the developer-tools overlay
pub const DEBUG_QUERY_KEY: &str = "debug_pm";

/// Value of `DEBUG_QUERY_KEY` that enables the overlay
pub const DEBUG_QUERY_ENABLED: &str = "yes";

/// Configuration errors
#[derive(Debug, Error)]
pub enum EditorConfigError {
    #[error("Invalid editor manager config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Editor manager configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorManagerConfig {
    /// Integration runs never touch the debug hooks
    pub integration: bool,
    /// Query string seen at load time, with or without the leading `?`
    pub query: String,
}

impl EditorManagerConfig {
    pub fn new(integration: bool, query: impl Into<String>) -> Self {
        Self {
            integration,
            query: query.into(),
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, EditorConfigError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// True when the load-time query asks for the overlay
    ///
    /// Only the first `debug_pm` pair counts.
    pub fn dev_tools_requested(&self) -> bool {
        let query = self.query.strip_prefix('?').unwrap_or(&self.query);
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == DEBUG_QUERY_KEY)
            .map(|(_, value)| value == DEBUG_QUERY_ENABLED)
            .unwrap_or(false)
    }
}

/// Loads the developer-tools overlay onto an editor
pub trait DevToolsLoader<E> {
    fn load(&self, editor: &Rc<E>);
}

/// Editors published for inspection
///
/// Holds weak references only; publishing never keeps an unmounted editor
/// alive.
#[derive(Debug)]
pub struct DebugGlobals<E> {
    primary: Weak<E>,
    secondary: Weak<E>,
    publications: u64,
}

impl<E> Default for DebugGlobals<E> {
    fn default() -> Self {
        Self {
            primary: Weak::new(),
            secondary: Weak::new(),
            publications: 0,
        }
    }
}

impl<E> DebugGlobals<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn publish(&mut self, primary: Option<&Rc<E>>, secondary: Option<&Rc<E>>) {
        self.primary = primary.map(Rc::downgrade).unwrap_or_default();
        self.secondary = secondary.map(Rc::downgrade).unwrap_or_default();
        self.publications += 1;
    }

    pub fn primary_editor(&self) -> Option<Rc<E>> {
        self.primary.upgrade()
    }

    pub fn secondary_editor(&self) -> Option<Rc<E>> {
        self.secondary.upgrade()
    }

    /// Number of times the editors were published
    pub fn publications(&self) -> u64 {
        self.publications
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_tools_requested() {
        assert!(EditorManagerConfig::new(false, "?debug_pm=yes").dev_tools_requested());
        assert!(EditorManagerConfig::new(false, "a=1&debug_pm=yes").dev_tools_requested());
        assert!(!EditorManagerConfig::new(false, "?debug_pm=no").dev_tools_requested());
        assert!(!EditorManagerConfig::new(false, "").dev_tools_requested());
    }

    #[test]
    fn test_first_debug_pair_wins() {
        let config = EditorManagerConfig::new(false, "debug_pm=no&debug_pm=yes");
        assert!(!config.dev_tools_requested());
    }

    #[test]
    fn test_query_is_percent_decoded() {
        let config = EditorManagerConfig::new(false, "debug%5Fpm=y%65s");
        assert!(config.dev_tools_requested());
    }

    #[test]
    fn test_config_from_json() {
        let config = EditorManagerConfig::from_json(br#"{ "integration": true }"#).unwrap();
        assert!(config.integration);
        assert_eq!(config.query, "");

        assert!(EditorManagerConfig::from_json(b"nope").is_err());
    }

    #[test]
    fn test_debug_globals_hold_weak_refs() {
        let mut globals = DebugGlobals::new();
        let editor = Rc::new(7u32);

        globals.publish(Some(&editor), None);
        assert_eq!(globals.primary_editor().as_deref(), Some(&7));
        assert!(globals.secondary_editor().is_none());
        assert_eq!(globals.publications(), 1);

        drop(editor);
        assert!(globals.primary_editor().is_none());
    }
}
