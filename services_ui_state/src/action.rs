//! UI actions and their wire format
//!
//! On the wire an action is `{ "name": ..., "value": ... }`. Names that do
//! not belong to this slice decode to `UiAction::Foreign` so that other
//! slices can share the same dispatch channel.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use services_notification::NotificationRecord;
use thiserror::Error;

use crate::state::{PaletteType, Theme, WindowSize};

/// Fully qualified action names
pub mod names {
    pub const PREFIX: &str = "action::ui-context:";
    pub const TOGGLE_SIDEBAR: &str = "action::ui-context:TOGGLE_SIDEBAR";
    pub const CHANGE_SIDEBAR: &str = "action::ui-context:CHANGE_SIDEBAR";
    pub const SHOW_NOTIFICATION: &str = "action::ui-context:SHOW_NOTIFICATION";
    pub const DISMISS_NOTIFICATION: &str = "action::ui-context:DISMISS_NOTIFICATION";
    pub const UPDATE_PALETTE: &str = "action::ui-context:UPDATE_PALETTE";
    pub const RESET_PALETTE: &str = "action::ui-context:RESET_PALETTE";
    pub const TOGGLE_THEME: &str = "action::ui-context:TOGGLE_THEME";
    pub const UPDATE_THEME: &str = "action::ui-context:UPDATE_THEME";
    pub const UPDATE_WINDOW_SIZE: &str = "action::ui-context:UPDATE_WINDOW_SIZE";
    pub const SHOW_MODAL: &str = "action::ui-context:SHOW_MODAL";
    pub const DISMISS_MODAL: &str = "action::ui-context:DISMISS_MODAL";
    pub const UPDATE_NEW_CHANGELOG: &str = "action::ui-context:UPDATE_NEW_CHANGELOG";
    pub const UPDATE_NOTE_SIDEBAR: &str = "action::ui-context:UPDATE_NOTE_SIDEBAR";
    pub const TOGGLE_NOTE_SIDEBAR: &str = "action::ui-context:TOGGLE_NOTE_SIDEBAR";
}

/// Action decoding errors
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Action {name} requires a value")]
    MissingValue { name: String },

    #[error("Invalid value for action {name}: {source}")]
    InvalidValue {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An action as it travels between producers and the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireAction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl WireAction {
    /// Creates an action without a payload
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Creates an action with a payload
    pub fn with_value(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }
}

/// Every action the UI slice understands
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    ToggleSidebar {
        sidebar: String,
    },
    ChangeSidebar {
        sidebar: Option<String>,
    },
    ShowNotification(NotificationRecord),
    DismissNotification {
        uid: String,
    },
    UpdatePalette {
        palette_type: Option<PaletteType>,
        initial_query: Option<String>,
    },
    ResetPalette,
    ToggleTheme,
    UpdateTheme {
        theme: Theme,
    },
    UpdateWindowSize {
        window_size: WindowSize,
    },
    ShowModal {
        modal: Option<String>,
        modal_value: Option<Value>,
    },
    DismissModal,
    UpdateNewChangelog {
        has_updates: bool,
    },
    UpdateNoteSidebar {
        visible: bool,
    },
    ToggleNoteSidebar,
    /// An action addressed to some other slice
    Foreign {
        name: String,
    },
}

#[derive(Deserialize)]
struct SidebarValue {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct UidValue {
    uid: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaletteValue {
    #[serde(rename = "type")]
    kind: Option<PaletteType>,
    #[serde(default)]
    initial_query: Option<String>,
}

#[derive(Deserialize)]
struct ThemeValue {
    theme: Theme,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowSizeValue {
    window_size: WindowSize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModalValue {
    modal: Option<String>,
    #[serde(default)]
    modal_value: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangelogValue {
    has_updates: bool,
}

#[derive(Deserialize)]
struct VisibleValue {
    visible: bool,
}

fn decode<T: DeserializeOwned>(wire: &WireAction) -> Result<T, ActionError> {
    let value = wire.value.clone().ok_or_else(|| ActionError::MissingValue {
        name: wire.name.clone(),
    })?;
    serde_json::from_value(value).map_err(|source| ActionError::InvalidValue {
        name: wire.name.clone(),
        source,
    })
}

impl UiAction {
    /// Decodes a wire action
    ///
    /// Unknown names become `Foreign`; a known name with a malformed payload
    /// is an error.
    pub fn from_wire(wire: &WireAction) -> Result<Self, ActionError> {
        let action = match wire.name.as_str() {
            names::TOGGLE_SIDEBAR => {
                let v: SidebarValue = decode(wire)?;
                UiAction::ToggleSidebar {
                    sidebar: v.kind.unwrap_or_default(),
                }
            }
            names::CHANGE_SIDEBAR => {
                let v: SidebarValue = decode(wire)?;
                UiAction::ChangeSidebar { sidebar: v.kind }
            }
            names::SHOW_NOTIFICATION => UiAction::ShowNotification(decode(wire)?),
            names::DISMISS_NOTIFICATION => {
                let v: UidValue = decode(wire)?;
                UiAction::DismissNotification { uid: v.uid }
            }
            names::UPDATE_PALETTE => {
                let v: PaletteValue = decode(wire)?;
                UiAction::UpdatePalette {
                    palette_type: v.kind,
                    initial_query: v.initial_query,
                }
            }
            names::RESET_PALETTE => UiAction::ResetPalette,
            names::TOGGLE_THEME => UiAction::ToggleTheme,
            names::UPDATE_THEME => {
                let v: ThemeValue = decode(wire)?;
                UiAction::UpdateTheme { theme: v.theme }
            }
            names::UPDATE_WINDOW_SIZE => {
                let v: WindowSizeValue = decode(wire)?;
                UiAction::UpdateWindowSize {
                    window_size: v.window_size,
                }
            }
            names::SHOW_MODAL => {
                let v: ModalValue = decode(wire)?;
                UiAction::ShowModal {
                    modal: v.modal,
                    modal_value: v.modal_value,
                }
            }
            names::DISMISS_MODAL => UiAction::DismissModal,
            names::UPDATE_NEW_CHANGELOG => {
                let v: ChangelogValue = decode(wire)?;
                UiAction::UpdateNewChangelog {
                    has_updates: v.has_updates,
                }
            }
            names::UPDATE_NOTE_SIDEBAR => {
                let v: VisibleValue = decode(wire)?;
                UiAction::UpdateNoteSidebar { visible: v.visible }
            }
            names::TOGGLE_NOTE_SIDEBAR => UiAction::ToggleNoteSidebar,
            other => UiAction::Foreign {
                name: other.to_string(),
            },
        };

        Ok(action)
    }

    /// Encodes this action in wire form
    pub fn to_wire(&self) -> WireAction {
        let name = self.name();
        match self {
            UiAction::ToggleSidebar { sidebar } => {
                WireAction::with_value(name, json!({ "type": sidebar }))
            }
            UiAction::ChangeSidebar { sidebar } => {
                WireAction::with_value(name, json!({ "type": sidebar }))
            }
            UiAction::ShowNotification(record) => WireAction {
                name: name.to_string(),
                value: serde_json::to_value(record).ok(),
            },
            UiAction::DismissNotification { uid } => {
                WireAction::with_value(name, json!({ "uid": uid }))
            }
            UiAction::UpdatePalette {
                palette_type,
                initial_query,
            } => WireAction::with_value(
                name,
                json!({ "type": palette_type, "initialQuery": initial_query }),
            ),
            UiAction::UpdateTheme { theme } => {
                WireAction::with_value(name, json!({ "theme": theme }))
            }
            UiAction::UpdateWindowSize { window_size } => {
                WireAction::with_value(name, json!({ "windowSize": window_size }))
            }
            UiAction::ShowModal { modal, modal_value } => WireAction::with_value(
                name,
                json!({ "modal": modal, "modalValue": modal_value }),
            ),
            UiAction::UpdateNewChangelog { has_updates } => {
                WireAction::with_value(name, json!({ "hasUpdates": has_updates }))
            }
            UiAction::UpdateNoteSidebar { visible } => {
                WireAction::with_value(name, json!({ "visible": visible }))
            }
            UiAction::ResetPalette
            | UiAction::ToggleTheme
            | UiAction::DismissModal
            | UiAction::ToggleNoteSidebar
            | UiAction::Foreign { .. } => WireAction::new(name),
        }
    }

    /// Fully qualified action name
    pub fn name(&self) -> &str {
        match self {
            UiAction::ToggleSidebar { .. } => names::TOGGLE_SIDEBAR,
            UiAction::ChangeSidebar { .. } => names::CHANGE_SIDEBAR,
            UiAction::ShowNotification(_) => names::SHOW_NOTIFICATION,
            UiAction::DismissNotification { .. } => names::DISMISS_NOTIFICATION,
            UiAction::UpdatePalette { .. } => names::UPDATE_PALETTE,
            UiAction::ResetPalette => names::RESET_PALETTE,
            UiAction::ToggleTheme => names::TOGGLE_THEME,
            UiAction::UpdateTheme { .. } => names::UPDATE_THEME,
            UiAction::UpdateWindowSize { .. } => names::UPDATE_WINDOW_SIZE,
            UiAction::ShowModal { .. } => names::SHOW_MODAL,
            UiAction::DismissModal => names::DISMISS_MODAL,
            UiAction::UpdateNewChangelog { .. } => names::UPDATE_NEW_CHANGELOG,
            UiAction::UpdateNoteSidebar { .. } => names::UPDATE_NOTE_SIDEBAR,
            UiAction::ToggleNoteSidebar => names::TOGGLE_NOTE_SIDEBAR,
            UiAction::Foreign { name } => name.as_str(),
        }
    }
}
