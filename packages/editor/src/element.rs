//! # Elements
//!
//! An element is one pattern instance in a page tree. Elements live in the
//! page's arena and refer to each other by id: a parent lists its children
//! per slot, and a child keeps a non-owning link back to the slot holding it.

use crate::value::Value;
use std::collections::BTreeMap;

pub type ElementId = String;

/// Back-reference from a child to the slot holding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    pub element_id: ElementId,
    pub slot_id: String,
}

/// Position of an element inside its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub parent_id: ElementId,
    pub slot_id: String,
    pub index: usize,
}

impl Location {
    /// Same parent and same slot
    pub fn same_container(&self, other: &Location) -> bool {
        self.parent_id == other.parent_id && self.slot_id == other.slot_id
    }
}

/// A node in the page tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) name: String,
    pub(crate) pattern_id: Option<String>,
    pub(crate) properties: BTreeMap<String, Value>,
    pub(crate) slots: BTreeMap<String, Vec<ElementId>>,
    pub(crate) parent: Option<ParentLink>,
}

impl Element {
    pub(crate) fn new(id: ElementId, name: impl Into<String>, pattern_id: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pattern_id,
            properties: BTreeMap::new(),
            slots: BTreeMap::new(),
            parent: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern_id(&self) -> Option<&str> {
        self.pattern_id.as_deref()
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    /// Property value, optionally addressed into a nested object
    pub fn property_value(&self, property_id: &str, path: Option<&str>) -> Option<&Value> {
        let value = self.properties.get(property_id)?;
        match path {
            Some(path) => value.get_path(path),
            None => Some(value),
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &[ElementId])> {
        self.slots.iter().map(|(id, children)| (id.as_str(), children.as_slice()))
    }

    pub fn slot(&self, slot_id: &str) -> &[ElementId] {
        self.slots.get(slot_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    pub(crate) fn write_property(&mut self, property_id: &str, path: Option<&str>, value: Value) {
        match path {
            Some(path) => self
                .properties
                .entry(property_id.to_string())
                .or_insert(Value::Null)
                .set_path(path, value),
            None => {
                self.properties.insert(property_id.to_string(), value);
            }
        }
    }

    /// Remove a property, or only the nested value at `path`
    pub(crate) fn clear_property(&mut self, property_id: &str, path: Option<&str>) {
        match path {
            Some(path) => {
                if let Some(value) = self.properties.get_mut(property_id) {
                    value.remove_path(path);
                }
            }
            None => {
                self.properties.remove(property_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_nested_property() {
        let mut element = Element::new("e-1".to_string(), "Box", Some("box".to_string()));
        element.write_property("border", Some("color"), Value::from("red"));
        element.write_property("border", Some("width"), Value::Number(1.0));

        assert_eq!(element.property_value("border", Some("color")), Some(&Value::from("red")));
        assert_eq!(element.property_value("border", Some("width")), Some(&Value::Number(1.0)));
        assert!(element.property_value("padding", None).is_none());
    }

    #[test]
    fn test_clear_nested_property() {
        let mut element = Element::new("e-1".to_string(), "Box", Some("box".to_string()));
        element.write_property("border", Some("color"), Value::from("red"));
        element.write_property("border", Some("width"), Value::Number(1.0));

        element.clear_property("border", Some("color"));
        assert!(element.property_value("border", Some("color")).is_none());
        assert_eq!(element.property_value("border", Some("width")), Some(&Value::Number(1.0)));

        element.clear_property("border", None);
        assert!(element.properties().is_empty());
    }

    #[test]
    fn test_missing_slot_is_empty() {
        let element = Element::new("e-1".to_string(), "Box", None);
        assert!(element.slot("children").is_empty());
    }
}
