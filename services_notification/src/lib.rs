//! # Notification Model
//!
//! Structured notification records shown in the notification area.
//!
//! ## Philosophy
//!
//! - **Structured, not stdout**: Notifications are typed records, not print statements
//! - **Identified**: Every record carries a `uid`; the uid is its only identity
//! - **Prioritized**: Notifications have severity levels
//! - **Serializable**: Records are plain serde data so they can cross the action wire
//!
//! ## Example
//!
//! ```
//! use services_notification::{NotificationButton, NotificationRecord, Severity};
//!
//! let record = NotificationRecord::error("sync-failed", "Could not save note")
//!     .with_button(NotificationButton::new("Retry").with_action("retry-sync"));
//!
//! assert_eq!(record.severity, Severity::Error);
//! assert_eq!(record.buttons.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Notification severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Success message
    Success,
    /// Warning message
    Warning,
    /// Error message
    Error,
}

impl Severity {
    /// Icon shown next to the content
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Error => "exclamation-circle",
            Severity::Warning => "exclamation",
            Severity::Info => "information-circle",
            Severity::Success => "check-circle",
        }
    }

    /// CSS colour variable used for the icon
    pub fn color_var(&self) -> &'static str {
        match self {
            Severity::Error => "var(--severity-error-color)",
            Severity::Warning => "var(--severity-warning-color)",
            Severity::Info => "var(--severity-info-color)",
            Severity::Success => "var(--severity-success-color)",
        }
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a notification
///
/// Plain text renders as a single span; anything richer is carried as an
/// opaque node description the view layer knows how to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationContent {
    Text(String),
    Node(serde_json::Value),
}

impl NotificationContent {
    /// Returns the text if this is plain text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NotificationContent::Text(text) => Some(text.as_str()),
            NotificationContent::Node(_) => None,
        }
    }
}

impl Default for NotificationContent {
    fn default() -> Self {
        NotificationContent::Text(String::new())
    }
}

impl From<&str> for NotificationContent {
    fn from(text: &str) -> Self {
        NotificationContent::Text(text.to_string())
    }
}

impl From<String> for NotificationContent {
    fn from(text: String) -> Self {
        NotificationContent::Text(text)
    }
}

impl fmt::Display for NotificationContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationContent::Text(text) => f.write_str(text),
            NotificationContent::Node(node) => write!(f, "{}", node),
        }
    }
}

/// An action button rendered under the notification content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationButton {
    /// Button label
    pub label: String,
    /// Tooltip text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Action identifier the host runs when the button is pressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl NotificationButton {
    /// Creates a button with just a label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: None,
            action: None,
        }
    }

    /// Sets the tooltip
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Sets the action identifier
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// A notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Unique identifier; a second record with the same uid is ignored
    pub uid: String,
    /// Message body
    #[serde(default)]
    pub content: NotificationContent,
    /// Notification level
    pub severity: Severity,
    /// Action buttons, in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<NotificationButton>,
}

impl NotificationRecord {
    /// Creates a new notification
    pub fn new(
        uid: impl Into<String>,
        severity: Severity,
        content: impl Into<NotificationContent>,
    ) -> Self {
        Self {
            uid: uid.into(),
            content: content.into(),
            severity,
            buttons: Vec::new(),
        }
    }

    /// Creates a notification with a freshly generated uid
    pub fn with_generated_uid(severity: Severity, content: impl Into<NotificationContent>) -> Self {
        Self::new(Uuid::new_v4().to_string(), severity, content)
    }

    /// Creates an error notification
    pub fn error(uid: impl Into<String>, content: impl Into<NotificationContent>) -> Self {
        Self::new(uid, Severity::Error, content)
    }

    /// Creates a warning notification
    pub fn warning(uid: impl Into<String>, content: impl Into<NotificationContent>) -> Self {
        Self::new(uid, Severity::Warning, content)
    }

    /// Creates an info notification
    pub fn info(uid: impl Into<String>, content: impl Into<NotificationContent>) -> Self {
        Self::new(uid, Severity::Info, content)
    }

    /// Creates a success notification
    pub fn success(uid: impl Into<String>, content: impl Into<NotificationContent>) -> Self {
        Self::new(uid, Severity::Success, content)
    }

    /// Appends an action button
    pub fn with_button(mut self, button: NotificationButton) -> Self {
        self.buttons.push(button);
        self
    }
}

impl fmt::Display for NotificationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.uid, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Success);
        assert!(Severity::Success < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_severity_wire_names() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
        let parsed: Severity = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(parsed, Severity::Success);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_severity_presentation() {
        assert_eq!(Severity::Error.color_var(), "var(--severity-error-color)");
        assert_eq!(Severity::Info.icon(), "information-circle");
        assert_eq!(Severity::Success.icon(), "check-circle");
    }

    #[test]
    fn test_record_creation() {
        let record = NotificationRecord::info("a", "Saved");

        assert_eq!(record.uid, "a");
        assert_eq!(record.severity, Severity::Info);
        assert_eq!(record.content.as_text(), Some("Saved"));
        assert!(record.buttons.is_empty());
    }

    #[test]
    fn test_generated_uids_differ() {
        let a = NotificationRecord::with_generated_uid(Severity::Info, "x");
        let b = NotificationRecord::with_generated_uid(Severity::Info, "x");
        assert_ne!(a.uid, b.uid);
        assert!(Uuid::parse_str(&a.uid).is_ok());
    }

    #[test]
    fn test_record_with_buttons_keeps_order() {
        let record = NotificationRecord::warning("w", "Disk almost full")
            .with_button(NotificationButton::new("Later"))
            .with_button(NotificationButton::new("Clean up").with_hint("Free space"));

        assert_eq!(record.buttons[0].label, "Later");
        assert_eq!(record.buttons[1].label, "Clean up");
        assert_eq!(record.buttons[1].hint.as_deref(), Some("Free space"));
    }

    #[test]
    fn test_record_deserialize_minimal() {
        let record: NotificationRecord =
            serde_json::from_value(json!({ "uid": "a", "severity": "error", "content": "x" }))
                .unwrap();

        assert_eq!(record, NotificationRecord::error("a", "x"));
    }

    #[test]
    fn test_record_rich_content() {
        let record: NotificationRecord = serde_json::from_value(json!({
            "uid": "rich",
            "severity": "info",
            "content": { "link": "notes/today.md" }
        }))
        .unwrap();

        assert!(record.content.as_text().is_none());
        assert_eq!(
            record.content,
            NotificationContent::Node(json!({ "link": "notes/today.md" }))
        );
    }

    #[test]
    fn test_record_display() {
        let record = NotificationRecord::error("a", "x");
        assert_eq!(record.to_string(), "[error] a: x");
    }
}
