//! Minimal document model the presentation layer writes to

use std::collections::{BTreeMap, BTreeSet};

/// Element id of the document element
pub const HTML: &str = "html";
/// Element id of the body
pub const BODY: &str = "body";

/// A styled element: a class list plus attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Class list in sorted order
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Elements addressed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    elements: BTreeMap<String, Element>,
}

impl Document {
    /// Creates a document with `html`, `body` and an app root element
    pub fn new(root_id: &str) -> Self {
        let mut document = Self::without_root();
        document.insert(root_id);
        document
    }

    /// Creates a document whose app root has not been mounted yet
    pub fn without_root() -> Self {
        let mut document = Self::default();
        document.insert(HTML);
        document.insert(BODY);
        document
    }

    /// Adds an empty element, keeping an existing one untouched
    pub fn insert(&mut self, id: &str) {
        self.elements.entry(id.to_string()).or_default();
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// True if element `id` exists and carries `class`
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id).map(|e| e.has_class(class)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_elements() {
        let document = Document::new("root");
        assert!(document.element(HTML).is_some());
        assert!(document.element(BODY).is_some());
        assert!(document.element("root").is_some());

        let bare = Document::without_root();
        assert!(bare.element("root").is_none());
    }

    #[test]
    fn test_element_classes() {
        let mut element = Element::new();
        element.add_class("b");
        element.add_class("a");
        element.add_class("a");

        assert_eq!(element.classes().collect::<Vec<_>>(), vec!["a", "b"]);

        element.remove_class("a");
        assert!(!element.has_class("a"));
        assert!(element.has_class("b"));
    }

    #[test]
    fn test_element_attributes() {
        let mut element = Element::new();
        element.set_attribute("data-theme", "dark");
        assert_eq!(element.attribute("data-theme"), Some("dark"));
        assert_eq!(element.attribute("missing"), None);
    }

    #[test]
    fn test_has_class_on_missing_element() {
        let document = Document::without_root();
        assert!(!document.has_class("root", "widescreen"));
    }
}
