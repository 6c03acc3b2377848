//! Headless editors mounted by the host

use services_editor_manager::{DevToolsLoader, EditorHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared host output, one entry per line
pub type OutputLog = Rc<RefCell<Vec<String>>>;

/// A named editor without a view
///
/// Focus is a flag; the host clears it with `blur` to simulate the user
/// clicking elsewhere.
#[derive(Debug)]
pub struct HostEditor {
    name: String,
    focused: Cell<bool>,
    focus_count: Cell<u32>,
}

impl HostEditor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            focused: Cell::new(false),
            focus_count: Cell::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blur(&self) {
        self.focused.set(false);
    }

    /// How often `focus` was called
    pub fn focus_count(&self) -> u32 {
        self.focus_count.get()
    }
}

impl EditorHandle for HostEditor {
    fn has_focus(&self) -> bool {
        self.focused.get()
    }

    fn focus(&self) {
        self.focused.set(true);
        self.focus_count.set(self.focus_count.get() + 1);
        tracing::debug!(editor = %self.name, "editor focused");
    }
}

/// Reports developer-tools attachment on the host output
#[derive(Debug, Clone)]
pub struct HostDevTools {
    output: OutputLog,
}

impl HostDevTools {
    pub fn new(output: OutputLog) -> Self {
        Self { output }
    }
}

impl DevToolsLoader<HostEditor> for HostDevTools {
    fn load(&self, editor: &Rc<HostEditor>) {
        tracing::info!(editor = %editor.name(), "developer tools attached");
        self.output
            .borrow_mut()
            .push(format!("devtools: attached to {}", editor.name()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_and_blur() {
        let editor = HostEditor::new("main");
        assert!(!editor.has_focus());

        editor.focus();
        assert!(editor.has_focus());
        assert_eq!(editor.focus_count(), 1);

        editor.blur();
        assert!(!editor.has_focus());
    }

    #[test]
    fn test_dev_tools_write_output() {
        let output = OutputLog::default();
        let loader = HostDevTools::new(Rc::clone(&output));

        loader.load(&Rc::new(HostEditor::new("main")));
        assert_eq!(*output.borrow(), vec!["devtools: attached to main".to_string()]);
    }
}
