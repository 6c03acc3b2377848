//! # Host Runtime
//!
//! Wires the UI store, the editor manager and a simulated window together and
//! runs scripts against them.

use crate::editor::{HostDevTools, HostEditor, OutputLog};
use crate::script::{Script, ScriptCommand, ScriptError};
use lifecycle::FrameScheduler;
use services_editor_manager::{
    bind_editor_manager, EditorHandle, EditorManager, EditorManagerConfig, EditorManagerError,
    MAX_EDITOR,
};
use services_notification::NotificationRecord;
use services_ui_state::document::{BODY, HTML};
use services_ui_state::{
    load_snapshot_safe, serialize_snapshot, ActionError, Document, DocumentPresentation,
    FakeWindow, NotificationArea, PersistedUiState, PersistenceError, UiAction, UiConfig,
    UiSideEffects, UiStore, WindowHost, WindowSize,
};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorManagerError),

    #[error("Unknown editor: {0}")]
    UnknownEditor(String),

    #[error("Failed to render state: {0}")]
    Render(#[source] serde_json::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] PersistenceError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        source: Box<HostRuntimeError>,
    },
}

/// Viewport of the simulated window when none is given
pub const DEFAULT_VIEWPORT: WindowSize = WindowSize {
    width: 1280,
    height: 800,
};

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostRuntimeConfig {
    /// Optional script text
    pub script: Option<String>,
    /// UI snapshot read at start and written back by `run`
    pub snapshot_path: Option<PathBuf>,
    pub ui: UiConfig,
    pub editor: EditorManagerConfig,
    /// Initial window size
    pub viewport: WindowSize,
    /// Simulated OS colour-scheme preference
    pub prefers_dark: bool,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            script: None,
            snapshot_path: None,
            ui: UiConfig::default(),
            editor: EditorManagerConfig::default(),
            viewport: DEFAULT_VIEWPORT,
            prefers_dark: false,
        }
    }
}

/// Host runtime
pub struct HostRuntime {
    config: HostRuntimeConfig,
    window: Rc<FakeWindow>,
    document: Rc<RefCell<Document>>,
    scheduler: FrameScheduler,
    store: UiStore,
    manager: Rc<RefCell<EditorManager<HostEditor>>>,
    side_effects: Option<UiSideEffects>,
    script: Option<Script>,
    output: OutputLog,
}

impl HostRuntime {
    /// Creates a new host runtime
    pub fn new(config: HostRuntimeConfig) -> Result<Self, HostRuntimeError> {
        let window =
            Rc::new(FakeWindow::new(config.viewport).with_dark_preference(config.prefers_dark));
        let document = Rc::new(RefCell::new(Document::new(&config.ui.root_element_id)));
        let scheduler = FrameScheduler::new();
        let output = OutputLog::default();

        let presentation = Box::new(DocumentPresentation::new(Rc::clone(&document), &config.ui));
        let snapshot = match &config.snapshot_path {
            Some(path) => read_snapshot(path)?,
            None => None,
        };
        let store = match snapshot {
            Some(snapshot) => UiStore::from_snapshot(
                &snapshot,
                window.as_ref(),
                config.ui.clone(),
                presentation,
            ),
            None => UiStore::from_window(window.as_ref(), config.ui.clone(), presentation),
        };

        let host: Rc<dyn WindowHost> = window.clone();
        let side_effects = store.start_side_effects(host, scheduler.clone());

        let manager = EditorManager::new(scheduler.clone(), config.editor.clone())
            .with_dev_tools(Rc::new(HostDevTools::new(Rc::clone(&output))));
        let manager = Rc::new(RefCell::new(manager));
        bind_editor_manager(&manager, &store);

        let script = config.script.as_deref().map(Script::from_text).transpose()?;

        tracing::info!(
            viewport = %config.viewport,
            integration = config.editor.integration,
            "host runtime ready"
        );

        Ok(Self {
            config,
            window,
            document,
            scheduler,
            store,
            manager,
            side_effects: Some(side_effects),
            script,
            output,
        })
    }

    /// Runs the script, then writes the snapshot back
    ///
    /// The snapshot is saved even when a script line fails; the script error
    /// takes precedence over a save error.
    pub fn run(&mut self) -> Result<(), HostRuntimeError> {
        let result = self.run_script();
        let saved = self.save_snapshot();
        result.and(saved)
    }

    fn run_script(&mut self) -> Result<(), HostRuntimeError> {
        while let Some((line, command)) = self.script.as_mut().and_then(Script::next_command) {
            self.execute(command)
                .map_err(|source| HostRuntimeError::AtLine {
                    line,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    /// Executes one command
    pub fn execute(&mut self, command: ScriptCommand) -> Result<(), HostRuntimeError> {
        tracing::debug!(?command, "executing host command");
        match command {
            ScriptCommand::Dispatch(wire) => self.store.dispatch_wire(&wire)?,
            ScriptCommand::Notify { severity, text } => {
                let record = NotificationRecord::with_generated_uid(severity, text);
                self.store.dispatch(UiAction::ShowNotification(record));
            }
            ScriptCommand::Resize(size) => self.window.resize(size),
            ScriptCommand::Frame => {
                let ran = self.scheduler.run_frame();
                tracing::trace!(ran, "frame");
            }
            ScriptCommand::Idle => {
                let ran = self.scheduler.run_idle();
                tracing::trace!(ran, "idle");
            }
            ScriptCommand::MountEditor { slot, name } => {
                let editor = Rc::new(HostEditor::new(name));
                self.manager.borrow_mut().try_set_editor(slot, Some(editor))?;
            }
            ScriptCommand::ClearEditor { slot } => {
                self.manager.borrow_mut().try_set_editor(slot, None)?;
            }
            ScriptCommand::FocusOut { name } => {
                let editor = self
                    .find_editor(&name)
                    .ok_or(HostRuntimeError::UnknownEditor(name))?;
                editor.blur();
            }
            ScriptCommand::Print => {
                let rendered = self.render()?;
                self.output
                    .borrow_mut()
                    .extend(rendered.lines().map(str::to_string));
            }
        }
        Ok(())
    }

    /// Renders the UI as plain text
    pub fn render(&self) -> Result<String, HostRuntimeError> {
        let state = self.store.state();
        let mut lines = vec![format!(
            "state: {}",
            serde_json::to_string(&*state).map_err(HostRuntimeError::Render)?
        )];

        let document = self.document.borrow();
        let elements: Vec<String> = [HTML, self.config.ui.root_element_id.as_str(), BODY]
            .iter()
            .filter_map(|id| {
                document.element(id).map(|element| {
                    let classes: Vec<&str> = element.classes().collect();
                    format!("{}[{}]", id, classes.join(" "))
                })
            })
            .collect();
        lines.push(format!("document: {}", elements.join(" ")));

        let manager = self.manager.borrow();
        let editors: Vec<String> = (0..MAX_EDITOR)
            .map(|slot| match manager.get_editor(slot) {
                Some(editor) if editor.has_focus() => format!("{}={}*", slot, editor.name()),
                Some(editor) => format!("{}={}", slot, editor.name()),
                None => format!("{}=-", slot),
            })
            .collect();
        lines.push(format!("editors: {}", editors.join(" ")));

        for banner in NotificationArea::render(&state) {
            lines.push(format!("notification: {}", banner));
        }

        Ok(lines.join("\n"))
    }

    /// Writes the persisted projection to the snapshot path, if any
    pub fn save_snapshot(&self) -> Result<(), HostRuntimeError> {
        let Some(path) = &self.config.snapshot_path else {
            return Ok(());
        };
        let bytes = serialize_snapshot(&self.store.snapshot())?;
        fs::write(path, bytes).map_err(|source| HostRuntimeError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "snapshot written");
        Ok(())
    }

    /// Stops listening for window resizes
    pub fn shutdown(&mut self) {
        if let Some(side_effects) = self.side_effects.take() {
            side_effects.destroy();
        }
    }

    pub fn store(&self) -> &UiStore {
        &self.store
    }

    pub fn window(&self) -> &Rc<FakeWindow> {
        &self.window
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn document(&self) -> &Rc<RefCell<Document>> {
        &self.document
    }

    /// Looks up a mounted editor by name
    pub fn find_editor(&self, name: &str) -> Option<Rc<HostEditor>> {
        let manager = self.manager.borrow();
        (0..MAX_EDITOR)
            .filter_map(|slot| manager.get_editor(slot))
            .find(|editor| editor.name() == name)
            .cloned()
    }

    /// Output produced so far
    pub fn output(&self) -> Vec<String> {
        self.output.borrow().clone()
    }

    /// Drains the output produced so far
    pub fn take_output(&self) -> Vec<String> {
        std::mem::take(&mut *self.output.borrow_mut())
    }
}

fn read_snapshot(path: &Path) -> Result<Option<PersistedUiState>, HostRuntimeError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(load_snapshot_safe(&bytes))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(HostRuntimeError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime(script: &str) -> HostRuntime {
        HostRuntime::new(HostRuntimeConfig {
            script: Some(script.to_string()),
            editor: EditorManagerConfig::new(true, ""),
            ..HostRuntimeConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_runtime_starts_with_presentation_applied() {
        let runtime = HostRuntime::new(HostRuntimeConfig::default()).unwrap();
        assert!(runtime.store().state().widescreen);
        assert!(runtime.document().borrow().has_class(BODY, "widescreen"));
        assert_eq!(runtime.window().listener_count(), 1);
    }

    #[test]
    fn test_invalid_script_rejected() {
        let result = HostRuntime::new(HostRuntimeConfig {
            script: Some("warp 9".to_string()),
            ..HostRuntimeConfig::default()
        });
        assert!(matches!(result, Err(HostRuntimeError::Script(_))));
    }

    #[test]
    fn test_mount_and_focus_out() {
        let mut runtime = runtime("editor 0 main\nframe\nfocus-out main");
        runtime.run().unwrap();

        let editor = runtime.find_editor("main").unwrap();
        assert!(!editor.has_focus());
        assert_eq!(editor.focus_count(), 1);
    }

    #[test]
    fn test_errors_carry_script_line() {
        let mut runtime = runtime("frame\nfocus-out ghost");
        let err = runtime.run().unwrap_err();
        assert!(matches!(err, HostRuntimeError::AtLine { line: 2, .. }));
        assert_eq!(err.to_string(), "line 2: Unknown editor: ghost");
    }

    #[test]
    fn test_slot_out_of_range_is_an_error() {
        let mut runtime = runtime("editor 2 extra");
        let err = runtime.run().unwrap_err();
        match err {
            HostRuntimeError::AtLine { source, .. } => {
                assert!(matches!(*source, HostRuntimeError::Editor(_)))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_shutdown_releases_listener() {
        let mut runtime = HostRuntime::new(HostRuntimeConfig::default()).unwrap();
        runtime.shutdown();
        assert_eq!(runtime.window().listener_count(), 0);
    }

    #[test]
    fn test_print_renders_state() {
        let mut runtime = runtime("editor 0 main\nframe\nnotify error Sync failed\nprint");
        runtime.run().unwrap();

        let output = runtime.take_output();
        assert!(output[0].starts_with("state: {"));
        assert_eq!(
            output[1],
            "document: html[light-theme] root[widescreen] body[widescreen]"
        );
        assert_eq!(output[2], "editors: 0=main* 1=-");
        assert_eq!(
            output[3],
            "notification: (exclamation-circle) Sync failed [x dismiss]"
        );
        assert!(runtime.output().is_empty());
    }
}
