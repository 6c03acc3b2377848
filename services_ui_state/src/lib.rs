//! # UI State Service
//!
//! The UI chrome slice: sidebars, modals, notifications, command palette,
//! theme and the widescreen breakpoint.
//!
//! ## Philosophy
//!
//! - **Pure reduction**: `UiSlice::apply` never performs side effects
//! - **Total**: Every action, known or foreign, produces a state; no-ops hand
//!   back the same `Rc`
//! - **Explicit effects**: Theme and widescreen are mirrored onto the document
//!   through the `Presentation` trait, never from inside the reducer
//! - **Scoped listeners**: The resize listener lives exactly as long as the
//!   `UiSideEffects` guard that registered it
//!
//! ## Example
//!
//! ```
//! use services_ui_state::{FakeWindow, RecordingPresentation, UiAction, UiConfig, UiStore, WindowSize};
//!
//! let window = FakeWindow::new(WindowSize::new(1024, 768));
//! let store = UiStore::from_window(&window, UiConfig::default(), Box::new(RecordingPresentation::new()));
//!
//! store.dispatch(UiAction::ToggleSidebar { sidebar: "files".to_string() });
//! assert_eq!(store.state().sidebar.as_deref(), Some("files"));
//! ```

pub mod action;
pub mod config;
pub mod document;
pub mod notification_area;
pub mod persistence;
pub mod presentation;
pub mod reducer;
pub mod state;
pub mod store;
pub mod window;

pub use action::{names, ActionError, UiAction, WireAction};
pub use config::{ConfigError, UiConfig};
pub use document::{Document, Element};
pub use notification_area::{NotificationArea, NotificationBanner};
pub use persistence::{
    deserialize_snapshot, from_persisted, load_snapshot_safe, serialize_snapshot, to_persisted,
    PersistedUiState, PersistenceError,
};
pub use presentation::{DocumentPresentation, Presentation, PresentationCall, RecordingPresentation};
pub use reducer::{apply, UiSlice};
pub use state::{check_widescreen, PaletteType, Theme, UiState, WindowSize, DEFAULT_WIDESCREEN_WIDTH};
pub use store::{SubscriptionId, UiSideEffects, UiStore, WeakUiStore};
pub use window::{FakeWindow, ListenerId, WindowHost};
