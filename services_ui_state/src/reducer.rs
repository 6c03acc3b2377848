//! The UI slice reducer

use serde_json::Value;
use std::rc::Rc;

use crate::action::UiAction;
use crate::config::UiConfig;
use crate::state::{check_widescreen, UiState};

/// Reducer for the UI slice
#[derive(Debug, Clone, Default)]
pub struct UiSlice {
    config: UiConfig,
}

impl UiSlice {
    /// Creates a reducer using `config` for the widescreen breakpoint
    pub fn new(config: UiConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Applies one action
    ///
    /// Pure and total. When nothing changes the returned `Rc` is the one that
    /// was passed in, so callers can skip work with `Rc::ptr_eq`.
    pub fn apply(&self, action: &UiAction, state: &Rc<UiState>) -> Rc<UiState> {
        let mut next = UiState::clone(state);

        match action {
            UiAction::ToggleSidebar { sidebar } => {
                next.sidebar = match state.sidebar.as_deref() {
                    Some(active) if !active.is_empty() => None,
                    _ => Some(sidebar.clone()),
                };
            }
            UiAction::ChangeSidebar { sidebar } => {
                next.sidebar = sidebar.clone();
            }
            UiAction::ShowNotification(record) => {
                // Repeat firing of the same uid is ignored
                if state.has_notification(&record.uid) {
                    return Rc::clone(state);
                }
                next.notifications = state
                    .notifications
                    .iter()
                    .cloned()
                    .chain(std::iter::once(record.clone()))
                    .collect();
            }
            UiAction::DismissNotification { uid } => {
                if !state.has_notification(uid) {
                    return Rc::clone(state);
                }
                next.notifications = state
                    .notifications
                    .iter()
                    .filter(|n| &n.uid != uid)
                    .cloned()
                    .collect();
            }
            UiAction::UpdatePalette {
                palette_type,
                initial_query,
            } => {
                next.palette_type = palette_type.clone();
                next.palette_initial_query = initial_query.clone();
            }
            UiAction::ResetPalette => {
                next.palette_type = None;
                next.palette_initial_query = Some(String::new());
                next.palette_metadata = Some(Value::Object(Default::default()));
            }
            UiAction::ToggleTheme => {
                next.theme = state.theme.toggled();
            }
            UiAction::UpdateTheme { theme } => {
                next.theme = *theme;
            }
            UiAction::UpdateWindowSize { window_size } => {
                next.widescreen =
                    check_widescreen(window_size.width, self.config.widescreen_threshold);
            }
            UiAction::ShowModal { modal, modal_value } => {
                next.modal = modal.clone();
                next.modal_value = modal_value.clone();
            }
            UiAction::DismissModal => {
                next.modal = None;
                next.modal_value = None;
            }
            UiAction::UpdateNewChangelog { has_updates } => {
                next.changelog_has_updates = *has_updates;
            }
            UiAction::UpdateNoteSidebar { visible } => {
                next.note_sidebar = *visible;
            }
            UiAction::ToggleNoteSidebar => {
                next.note_sidebar = !state.note_sidebar;
            }
            UiAction::Foreign { .. } => return Rc::clone(state),
        }

        Rc::new(next)
    }
}

/// Applies one action with the default configuration
pub fn apply(action: &UiAction, state: &Rc<UiState>) -> Rc<UiState> {
    UiSlice::default().apply(action, state)
}
