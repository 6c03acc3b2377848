//! # Notes UI Host
//!
//! A headless host for the notes UI core: a simulated window and document,
//! the UI store and the editor manager, driven by scripts.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: Services never print; the host collects output
//! - **Deterministic**: Frames and idle callbacks run only when the script
//!   says so
//! - **Snapshot in, snapshot out**: Persisted UI state is read at start and
//!   written back on exit
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Render real pixels or a real DOM
//! - Edit documents (editors are named placeholders)

pub mod editor;
pub mod runtime;
pub mod script;

pub use editor::{HostDevTools, HostEditor, OutputLog};
pub use runtime::{HostRuntime, HostRuntimeConfig, HostRuntimeError, DEFAULT_VIEWPORT};
pub use script::{Script, ScriptCommand, ScriptError};
