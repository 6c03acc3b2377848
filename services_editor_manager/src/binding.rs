//! Connects an editor manager to the UI store

use services_ui_state::{SubscriptionId, UiStore};
use std::cell::RefCell;
use std::rc::Rc;

use crate::{EditorHandle, EditorManager};

/// Drives the manager's focus effects from the store's palette state
///
/// The manager is synced with the current state right away. The subscription
/// holds a weak reference, so dropping the manager makes it inert; remove it
/// with `UiStore::unsubscribe`.
pub fn bind_editor_manager<E: EditorHandle + 'static>(
    manager: &Rc<RefCell<EditorManager<E>>>,
    store: &UiStore,
) -> SubscriptionId {
    manager
        .borrow_mut()
        .sync_palette(store.state().palette_active());

    let weak = Rc::downgrade(manager);
    store.subscribe(move |state| {
        if let Some(manager) = weak.upgrade() {
            manager.borrow_mut().sync_palette(state.palette_active());
        }
    })
}
