//! Notification area view model
//!
//! Turns the notification list into banners, bottom-right, oldest first.

use services_notification::{NotificationButton, NotificationContent, NotificationRecord, Severity};
use std::fmt;

use crate::action::UiAction;
use crate::state::UiState;
use crate::store::UiStore;

/// Tooltip on every banner's close button
pub const DISMISS_HINT: &str = "dismiss";

/// One rendered notification
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationBanner {
    pub uid: String,
    pub severity: Severity,
    pub icon: &'static str,
    pub icon_color: &'static str,
    pub content: NotificationContent,
    pub buttons: Vec<NotificationButton>,
    pub dismiss_hint: &'static str,
}

impl From<&NotificationRecord> for NotificationBanner {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            uid: record.uid.clone(),
            severity: record.severity,
            icon: record.severity.icon(),
            icon_color: record.severity.color_var(),
            content: record.content.clone(),
            buttons: record.buttons.clone(),
            dismiss_hint: DISMISS_HINT,
        }
    }
}

impl fmt::Display for NotificationBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.icon, self.content)?;
        for button in &self.buttons {
            write!(f, " [{}]", button.label)?;
        }
        write!(f, " [x {}]", self.dismiss_hint)
    }
}

/// The notification area
pub struct NotificationArea;

impl NotificationArea {
    /// Renders every notification in insertion order
    pub fn render(state: &UiState) -> Vec<NotificationBanner> {
        state
            .notifications
            .iter()
            .map(NotificationBanner::from)
            .collect()
    }

    /// Renders the area as text, one banner per line
    pub fn render_text(state: &UiState) -> String {
        Self::render(state)
            .iter()
            .map(|banner| banner.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Handles the close button of banner `uid`
    pub fn dismiss(store: &UiStore, uid: &str) {
        store.dispatch(UiAction::DismissNotification {
            uid: uid.to_string(),
        });
    }
}
