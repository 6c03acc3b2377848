//! # Editor Manager Service
//!
//! Tracks the mounted editors of the split view and keeps keyboard focus in
//! them while no command palette is open.
//!
//! ## Philosophy
//!
//! - **Fixed slots**: Exactly `MAX_EDITOR` slots; slot 0 is the primary pane,
//!   slot 1 the secondary
//! - **Single owner**: The manager owns its slots; readers only borrow
//! - **Per-slot effects**: Each slot restores its own focus, without
//!   coordinating with the other
//! - **Deferred focus**: Focus is applied on the next animation frame, never
//!   synchronously
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - An editor engine (editors are opaque `EditorHandle`s)
//! - Part of the action/reducer pipeline

pub mod binding;
pub mod debug;

pub use binding::bind_editor_manager;
pub use debug::{DebugGlobals, DevToolsLoader, EditorConfigError, EditorManagerConfig};

use lifecycle::FrameScheduler;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Number of editor slots
pub const MAX_EDITOR: usize = 2;

/// Slot of the primary pane
pub const PRIMARY_SLOT: usize = 0;

/// Slot of the secondary pane
pub const SECONDARY_SLOT: usize = 1;

/// The view of an editor the manager needs
pub trait EditorHandle {
    /// Returns true if the editor currently holds keyboard focus
    fn has_focus(&self) -> bool;

    /// Moves keyboard focus into the editor
    fn focus(&self);
}

/// Editor manager error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorManagerError {
    #[error("Editor slot {slot} out of range, only {max} slots allowed")]
    SlotOutOfRange { slot: usize, max: usize },
}

/// Editor registry for the primary and secondary panes
pub struct EditorManager<E> {
    slots: [Option<Rc<E>>; MAX_EDITOR],
    palette_active: bool,
    scheduler: FrameScheduler,
    config: EditorManagerConfig,
    debug_globals: DebugGlobals<E>,
    dev_tools: Option<Rc<dyn DevToolsLoader<E>>>,
}

impl<E: EditorHandle + 'static> EditorManager<E> {
    /// Creates an empty manager
    pub fn new(scheduler: FrameScheduler, config: EditorManagerConfig) -> Self {
        Self {
            slots: [None, None],
            palette_active: false,
            scheduler,
            config,
            debug_globals: DebugGlobals::new(),
            dev_tools: None,
        }
    }

    /// Sets the loader used for the developer-tools overlay
    pub fn with_dev_tools(mut self, loader: Rc<dyn DevToolsLoader<E>>) -> Self {
        self.dev_tools = Some(loader);
        self
    }

    /// Assigns or clears a slot
    ///
    /// # Panics
    ///
    /// Panics if `slot >= MAX_EDITOR`. Use `try_set_editor` to get an error
    /// instead.
    pub fn set_editor(&mut self, slot: usize, editor: Option<Rc<E>>) {
        if let Err(err) = self.try_set_editor(slot, editor) {
            panic!("{}", err);
        }
    }

    /// Assigns or clears a slot, rejecting out-of-range slots
    pub fn try_set_editor(
        &mut self,
        slot: usize,
        editor: Option<Rc<E>>,
    ) -> Result<(), EditorManagerError> {
        if slot >= MAX_EDITOR {
            return Err(EditorManagerError::SlotOutOfRange {
                slot,
                max: MAX_EDITOR,
            });
        }

        let changed = !same_editor(self.slots[slot].as_ref(), editor.as_ref());
        self.slots[slot] = editor;
        tracing::debug!(slot, changed, "editor slot assigned");

        if changed {
            self.restore_focus(slot);
        }
        self.publish_debug();
        Ok(())
    }

    /// The editor in `slot`, or `None` for empty and out-of-range slots
    pub fn get_editor(&self, slot: usize) -> Option<&Rc<E>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn primary_editor(&self) -> Option<&Rc<E>> {
        self.get_editor(PRIMARY_SLOT)
    }

    pub fn secondary_editor(&self) -> Option<&Rc<E>> {
        self.get_editor(SECONDARY_SLOT)
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a command palette is currently open
    pub fn palette_active(&self) -> bool {
        self.palette_active
    }

    /// Feeds the palette state in
    ///
    /// When the palette goes away each slot independently schedules focus
    /// for its editor.
    pub fn sync_palette(&mut self, palette_active: bool) {
        if self.palette_active == palette_active {
            return;
        }
        self.palette_active = palette_active;
        for slot in 0..MAX_EDITOR {
            self.restore_focus(slot);
        }
    }

    pub fn config(&self) -> &EditorManagerConfig {
        &self.config
    }

    /// Editors published for inspection
    pub fn debug_globals(&self) -> &DebugGlobals<E> {
        &self.debug_globals
    }

    fn restore_focus(&self, slot: usize) {
        if self.palette_active {
            return;
        }
        let Some(editor) = &self.slots[slot] else {
            return;
        };
        if editor.has_focus() {
            return;
        }

        let editor = Rc::downgrade(editor);
        let handle = self.scheduler.request_frame(move || {
            if let Some(editor) = editor.upgrade() {
                editor.focus();
            }
        });
        tracing::debug!(slot, %handle, "editor focus scheduled");
    }

    fn publish_debug(&mut self) {
        if self.config.integration {
            return;
        }
        self.debug_globals.publish(
            self.slots[PRIMARY_SLOT].as_ref(),
            self.slots[SECONDARY_SLOT].as_ref(),
        );

        let requested = self.config.dev_tools_requested();
        let primary = self.slots[PRIMARY_SLOT].as_ref().map(Rc::downgrade);
        let loader = self.dev_tools.clone();
        self.scheduler.request_idle(move || {
            if !requested {
                return;
            }
            let editor = primary.and_then(|editor| editor.upgrade());
            if let (Some(editor), Some(loader)) = (editor, loader) {
                tracing::debug!("loading developer tools");
                loader.load(&editor);
            }
        });
    }
}

fn same_editor<E>(a: Option<&Rc<E>>, b: Option<&Rc<E>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl<E> fmt::Debug for EditorManager<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let populated: Vec<bool> = self.slots.iter().map(Option::is_some).collect();
        f.debug_struct("EditorManager")
            .field("slots", &populated)
            .field("palette_active", &self.palette_active)
            .field("config", &self.config)
            .finish()
    }
}
