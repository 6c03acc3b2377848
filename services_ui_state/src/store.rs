//! The UI store: state holder, dispatcher and side-effect owner

use lifecycle::{FrameScheduler, RafThrottle};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::action::{ActionError, UiAction, WireAction};
use crate::config::UiConfig;
use crate::persistence::{from_persisted, to_persisted, PersistedUiState};
use crate::presentation::Presentation;
use crate::reducer::UiSlice;
use crate::state::UiState;
use crate::window::{ListenerId, WindowHost};

/// Identifies a state subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&Rc<UiState>)>;

struct StoreInner {
    slice: UiSlice,
    state: RefCell<Rc<UiState>>,
    presentation: RefCell<Box<dyn Presentation>>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    queue: RefCell<VecDeque<UiAction>>,
    dispatching: Cell<bool>,
}

/// Shared handle to the UI store
///
/// Clones refer to the same store. Actions dispatched while another dispatch
/// is in progress (for example from a subscriber) are queued and reduced
/// afterwards, in dispatch order.
#[derive(Clone)]
pub struct UiStore {
    inner: Rc<StoreInner>,
}

/// Non-owning handle to a `UiStore`
#[derive(Clone)]
pub struct WeakUiStore {
    inner: Weak<StoreInner>,
}

impl WeakUiStore {
    pub fn upgrade(&self) -> Option<UiStore> {
        self.inner.upgrade().map(|inner| UiStore { inner })
    }
}

impl UiStore {
    /// Creates a store around an explicit initial state
    pub fn new(initial: UiState, config: UiConfig, presentation: Box<dyn Presentation>) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                slice: UiSlice::new(config),
                state: RefCell::new(Rc::new(initial)),
                presentation: RefCell::new(presentation),
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                queue: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
            }),
        }
    }

    /// Creates a store with defaults derived from the window
    pub fn from_window(
        window: &dyn WindowHost,
        config: UiConfig,
        presentation: Box<dyn Presentation>,
    ) -> Self {
        let initial = UiState::initial(window, &config);
        Self::new(initial, config, presentation)
    }

    /// Creates a store rehydrated from a persisted snapshot
    pub fn from_snapshot(
        snapshot: &PersistedUiState,
        window: &dyn WindowHost,
        config: UiConfig,
        presentation: Box<dyn Presentation>,
    ) -> Self {
        let initial = from_persisted(snapshot, window, &config);
        Self::new(initial, config, presentation)
    }

    /// Current state
    pub fn state(&self) -> Rc<UiState> {
        Rc::clone(&self.inner.state.borrow())
    }

    pub fn config(&self) -> &UiConfig {
        self.inner.slice.config()
    }

    /// Persisted projection of the current state
    pub fn snapshot(&self) -> PersistedUiState {
        to_persisted(&self.state())
    }

    pub fn downgrade(&self) -> WeakUiStore {
        WeakUiStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Dispatches an action
    pub fn dispatch(&self, action: UiAction) {
        self.inner.queue.borrow_mut().push_back(action);
        if self.inner.dispatching.get() {
            return;
        }

        let _guard = DispatchGuard::enter(&self.inner);
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            match next {
                Some(action) => self.reduce(&action),
                None => break,
            }
        }
    }

    /// Decodes and dispatches a wire action
    pub fn dispatch_wire(&self, wire: &WireAction) -> Result<(), ActionError> {
        let action = UiAction::from_wire(wire)?;
        self.dispatch(action);
        Ok(())
    }

    /// Registers a callback run after every state change
    pub fn subscribe(&self, subscriber: impl Fn(&Rc<UiState>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        id
    }

    /// Removes a subscriber; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Starts the store's side effects
    ///
    /// Applies the current theme and widescreen class immediately and
    /// listens for window resizes, dispatching at most one
    /// `UpdateWindowSize` per animation frame. Everything is undone when the
    /// returned guard is dropped.
    pub fn start_side_effects(
        &self,
        window: Rc<dyn WindowHost>,
        scheduler: FrameScheduler,
    ) -> UiSideEffects {
        let state = self.state();
        {
            let mut presentation = self.inner.presentation.borrow_mut();
            presentation.apply_theme(state.theme);
            presentation.set_widescreen(state.widescreen);
        }

        let store = self.downgrade();
        let host = Rc::downgrade(&window);
        let throttle = Rc::new(RafThrottle::new(scheduler, move || {
            if let (Some(store), Some(host)) = (store.upgrade(), host.upgrade()) {
                store.dispatch(UiAction::UpdateWindowSize {
                    window_size: host.viewport(),
                });
            }
        }));

        let on_resize = Rc::clone(&throttle);
        let listener = window.add_resize_listener(Rc::new(move || on_resize.call()));
        tracing::debug!(%listener, "ui side effects started");

        UiSideEffects {
            window,
            listener: Some(listener),
            throttle,
        }
    }

    fn reduce(&self, action: &UiAction) {
        let prev = self.state();
        let next = self.inner.slice.apply(action, &prev);
        let changed = !Rc::ptr_eq(&prev, &next);
        tracing::debug!(action = action.name(), changed, "reduced ui action");

        if !changed {
            return;
        }
        *self.inner.state.borrow_mut() = Rc::clone(&next);

        self.present(action, &next);

        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber(&next);
        }
    }

    fn present(&self, action: &UiAction, state: &UiState) {
        let mut presentation = self.inner.presentation.borrow_mut();
        match action {
            UiAction::ToggleTheme | UiAction::UpdateTheme { .. } => {
                presentation.apply_theme(state.theme)
            }
            UiAction::UpdateWindowSize { .. } => presentation.set_widescreen(state.widescreen),
            _ => {}
        }
    }
}

/// Marks a dispatch in progress until dropped
///
/// If a reduction or subscriber panics, the queued actions are discarded so
/// the store keeps working for whoever catches the panic.
struct DispatchGuard<'a> {
    inner: &'a StoreInner,
}

impl<'a> DispatchGuard<'a> {
    fn enter(inner: &'a StoreInner) -> Self {
        inner.dispatching.set(true);
        Self { inner }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            if let Ok(mut queue) = self.inner.queue.try_borrow_mut() {
                queue.clear();
            }
        }
        self.inner.dispatching.set(false);
    }
}

impl fmt::Debug for UiStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiStore")
            .field("state", &self.state())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

/// Guard owning the store's resize listener
///
/// Dropping it cancels any pending throttled frame and unregisters the
/// listener, so repeated start/stop cycles never leak listeners.
pub struct UiSideEffects {
    window: Rc<dyn WindowHost>,
    listener: Option<ListenerId>,
    throttle: Rc<RafThrottle>,
}

impl UiSideEffects {
    /// Tears the side effects down now
    pub fn destroy(mut self) {
        self.release();
    }

    /// True until the guard is released
    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }

    /// True while a throttled resize is waiting for its frame
    pub fn resize_pending(&self) -> bool {
        self.throttle.is_pending()
    }

    fn release(&mut self) {
        self.throttle.cancel();
        if let Some(listener) = self.listener.take() {
            self.window.remove_resize_listener(listener);
            tracing::debug!(%listener, "ui side effects stopped");
        }
    }
}

impl Drop for UiSideEffects {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for UiSideEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiSideEffects")
            .field("listener", &self.listener)
            .field("throttle", &self.throttle)
            .finish()
    }
}
