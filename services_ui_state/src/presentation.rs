//! Presentation side effects
//!
//! The store calls into a `Presentation` after theme and window-size
//! reductions. Implementations are expected to be idempotent: applying the
//! same theme twice leaves the document as applying it once.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::UiConfig;
use crate::document::{Document, BODY, HTML};
use crate::state::Theme;

/// Attribute carrying the active theme on the document element
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Global presentation effects driven by UI state
pub trait Presentation {
    /// Applies the colour theme
    fn apply_theme(&mut self, theme: Theme);

    /// Adds or removes the widescreen layout class
    fn set_widescreen(&mut self, widescreen: bool);
}

fn theme_class(theme: Theme) -> String {
    format!("{}-theme", theme.as_str())
}

/// Writes presentation effects onto a shared `Document`
#[derive(Debug, Clone)]
pub struct DocumentPresentation {
    document: Rc<RefCell<Document>>,
    root_element_id: String,
    widescreen_class: String,
}

impl DocumentPresentation {
    pub fn new(document: Rc<RefCell<Document>>, config: &UiConfig) -> Self {
        Self {
            document,
            root_element_id: config.root_element_id.clone(),
            widescreen_class: config.widescreen_class.clone(),
        }
    }

    /// The document being written to
    pub fn document(&self) -> &Rc<RefCell<Document>> {
        &self.document
    }
}

impl Presentation for DocumentPresentation {
    fn apply_theme(&mut self, theme: Theme) {
        let mut document = self.document.borrow_mut();
        if let Some(html) = document.element_mut(HTML) {
            html.remove_class(&theme_class(theme.toggled()));
            html.add_class(&theme_class(theme));
            html.set_attribute(THEME_ATTRIBUTE, theme.as_str());
        }
    }

    fn set_widescreen(&mut self, widescreen: bool) {
        let mut document = self.document.borrow_mut();
        // A missing root is skipped; the body still gets the class
        for id in [self.root_element_id.as_str(), BODY] {
            if let Some(element) = document.element_mut(id) {
                if widescreen {
                    element.add_class(&self.widescreen_class);
                } else {
                    element.remove_class(&self.widescreen_class);
                }
            }
        }
    }
}

/// A recorded presentation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationCall {
    Theme(Theme),
    Widescreen(bool),
}

/// Records presentation calls for inspection
///
/// Clones share the same log, so a test can keep one clone and hand the
/// other to the store.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    calls: Rc<RefCell<Vec<PresentationCall>>>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far, oldest first
    pub fn calls(&self) -> Vec<PresentationCall> {
        self.calls.borrow().clone()
    }

    /// Forgets recorded calls
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Presentation for RecordingPresentation {
    fn apply_theme(&mut self, theme: Theme) {
        self.calls.borrow_mut().push(PresentationCall::Theme(theme));
    }

    fn set_widescreen(&mut self, widescreen: bool) {
        self.calls
            .borrow_mut()
            .push(PresentationCall::Widescreen(widescreen));
    }
}
