//! UI slice state

use serde::{Deserialize, Serialize};
use services_notification::NotificationRecord;
use std::fmt;
use std::rc::Rc;

use crate::config::UiConfig;
use crate::window::WindowHost;

/// Viewport widths above this many pixels are widescreen
pub const DEFAULT_WIDESCREEN_WIDTH: u32 = 759;

/// Returns true when `width` is past the widescreen breakpoint
pub fn check_widescreen(width: u32, threshold: u32) -> bool {
    width > threshold
}

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Picks the theme matching an OS colour-scheme preference
    pub fn from_preference(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Returns the opposite theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Lowercase name, as persisted
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Command palette variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteType(String);

impl PaletteType {
    /// Creates a palette type from its identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Runs application operations
    pub fn operation() -> Self {
        Self::new("core-palette/operation")
    }

    /// Opens notes by name
    pub fn notes() -> Self {
        Self::new("core-palette/notes")
    }

    /// Switches workspaces
    pub fn workspace() -> Self {
        Self::new("core-palette/workspace")
    }

    /// Jumps to a heading in the open note
    pub fn heading() -> Self {
        Self::new("core-palette/heading")
    }
}

impl fmt::Display for PaletteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaletteType {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The whole UI slice
///
/// States are shared as `Rc<UiState>` and never mutated in place; a reduction
/// builds a new value or hands back the old `Rc` untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub changelog_has_updates: bool,
    pub modal: Option<String>,
    pub modal_value: Option<serde_json::Value>,
    pub note_sidebar: bool,
    pub notifications: Rc<[NotificationRecord]>,
    pub palette_initial_query: Option<String>,
    pub palette_metadata: Option<serde_json::Value>,
    pub palette_type: Option<PaletteType>,
    pub sidebar: Option<String>,
    pub theme: Theme,
    pub widescreen: bool,
}

impl UiState {
    /// Builds the start-up state from the live window
    ///
    /// The theme follows the OS colour-scheme preference and `widescreen` is
    /// computed from the current viewport.
    pub fn initial(window: &dyn WindowHost, config: &UiConfig) -> Self {
        Self {
            theme: Theme::from_preference(window.prefers_dark_scheme()),
            widescreen: check_widescreen(window.viewport().width, config.widescreen_threshold),
            ..Self::default()
        }
    }

    /// Returns true if a notification with `uid` is present
    pub fn has_notification(&self, uid: &str) -> bool {
        self.notifications.iter().any(|n| n.uid == uid)
    }

    /// Returns true if a command palette is open
    pub fn palette_active(&self) -> bool {
        self.palette_type.is_some()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            changelog_has_updates: false,
            modal: None,
            modal_value: None,
            note_sidebar: false,
            notifications: Rc::from(Vec::new()),
            palette_initial_query: None,
            palette_metadata: None,
            palette_type: None,
            sidebar: None,
            theme: Theme::Light,
            widescreen: false,
        }
    }
}
