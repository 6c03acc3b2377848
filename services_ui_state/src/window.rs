//! Window host abstraction
//!
//! The store never talks to a real window. Everything it needs from one
//! (viewport size, colour-scheme preference, resize notifications) goes
//! through `WindowHost`, so the same code runs under a browser binding, a
//! native shell or the `FakeWindow` used in tests.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::state::WindowSize;

/// Identifies a registered resize listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener:{}", self.0)
    }
}

/// What the UI core needs from the hosting window
pub trait WindowHost {
    /// Current viewport size
    fn viewport(&self) -> WindowSize;

    /// True if the OS asks for a dark colour scheme
    fn prefers_dark_scheme(&self) -> bool;

    /// Registers a listener called on every resize event
    fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> ListenerId;

    /// Unregisters a listener; returns false if it was not registered
    fn remove_resize_listener(&self, id: ListenerId) -> bool;
}

/// In-memory window for tests and headless hosts
pub struct FakeWindow {
    size: Cell<WindowSize>,
    prefers_dark: Cell<bool>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn()>)>>,
    next_listener: Cell<u64>,
}

impl FakeWindow {
    /// Creates a window with the given viewport and a light preference
    pub fn new(size: WindowSize) -> Self {
        Self {
            size: Cell::new(size),
            prefers_dark: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    /// Sets the colour-scheme preference
    pub fn with_dark_preference(self, prefers_dark: bool) -> Self {
        self.prefers_dark.set(prefers_dark);
        self
    }

    /// Changes the viewport and fires one resize event
    pub fn resize(&self, size: WindowSize) {
        self.size.set(size);
        self.fire_resize();
    }

    /// Fires a resize event without changing the size
    pub fn fire_resize(&self) {
        // Listeners may add or remove listeners while running
        let listeners: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener();
        }
    }

    /// Number of registered resize listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl WindowHost for FakeWindow {
    fn viewport(&self) -> WindowSize {
        self.size.get()
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.prefers_dark.get()
    }

    fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_resize_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl fmt::Debug for FakeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeWindow")
            .field("size", &self.size.get())
            .field("prefers_dark", &self.prefers_dark.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_window_viewport() {
        let window = FakeWindow::new(WindowSize::new(800, 600));
        assert_eq!(window.viewport(), WindowSize::new(800, 600));
        assert!(!window.prefers_dark_scheme());

        let window = window.with_dark_preference(true);
        assert!(window.prefers_dark_scheme());
    }

    #[test]
    fn test_resize_notifies_listeners() {
        let window = FakeWindow::new(WindowSize::new(800, 600));
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        window.add_resize_listener(Rc::new(move || counter.set(counter.get() + 1)));

        window.resize(WindowSize::new(1000, 600));
        window.fire_resize();

        assert_eq!(hits.get(), 2);
        assert_eq!(window.viewport().width, 1000);
    }

    #[test]
    fn test_remove_listener() {
        let window = FakeWindow::new(WindowSize::new(800, 600));
        let id = window.add_resize_listener(Rc::new(|| {}));
        assert_eq!(window.listener_count(), 1);

        assert!(window.remove_resize_listener(id));
        assert!(!window.remove_resize_listener(id));
        assert_eq!(window.listener_count(), 0);
    }
}
