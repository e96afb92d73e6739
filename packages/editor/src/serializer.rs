//! # Serialization
//!
//! Persisted form of pages and elements:
//!
//! ```text
//! { "_type": "pattern", "id", "name", "pattern", "properties": {..}, "children": [..] }
//! ```
//!
//! Children of every slot are flattened into one `children` list; each child
//! names the slot it belongs to. The `_type` tag is what tells an element
//! apart from a plain object when it is embedded as a property value.

use crate::element::{Element, ElementId, ParentLink};
use crate::page::Page;
use crate::pattern::DEFAULT_SLOT;
use crate::value::Value;
use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordKind {
    #[default]
    #[serde(rename = "pattern")]
    Pattern,
}

/// Serialized element, recursively holding its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    #[serde(rename = "_type")]
    pub kind: RecordKind,
    pub id: ElementId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    #[serde(default)]
    pub children: Vec<ElementRecord>,
    /// Slot of the parent holding this element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
}

/// Serialized page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: String,
    pub name: String,
    pub root: ElementRecord,
}

/// Serialize an element and its subtree
pub fn serialize_element(page: &Page, id: &str) -> Result<ElementRecord, EditorError> {
    let element = page
        .node(id)
        .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;

    let mut children = Vec::new();
    for (slot_id, child_ids) in element.slots() {
        for child_id in child_ids {
            let mut child = serialize_element(page, child_id)?;
            child.slot = Some(slot_id.to_string());
            children.push(child);
        }
    }

    Ok(ElementRecord {
        kind: RecordKind::Pattern,
        id: element.id().to_string(),
        name: element.name().to_string(),
        pattern: element.pattern_id().map(str::to_string),
        properties: element.properties().clone(),
        children,
        slot: None,
    })
}

pub fn serialize_page(page: &Page) -> Result<PageRecord, EditorError> {
    Ok(PageRecord {
        id: page.id().to_string(),
        name: page.name().to_string(),
        root: serialize_element(page, page.root_id())?,
    })
}

/// Rebuild a page from its record
pub fn deserialize_page(record: PageRecord) -> Result<Page, EditorError> {
    let mut page = Page::empty(record.id, record.name);
    let root_id = build(&mut page, record.root, None)?;
    page.set_root(root_id);
    Ok(page)
}

fn build(page: &mut Page, record: ElementRecord, parent: Option<ParentLink>) -> Result<ElementId, EditorError> {
    let mut element = Element::new(record.id, record.name, record.pattern);
    element.properties = record.properties;
    element.parent = parent;

    for child in record.children {
        let slot_id = child.slot.clone().unwrap_or_else(|| DEFAULT_SLOT.to_string());
        let link = ParentLink {
            element_id: element.id.clone(),
            slot_id: slot_id.clone(),
        };
        let child_id = build(page, child, Some(link))?;
        element.slots.entry(slot_id).or_default().push(child_id);
    }

    let id = element.id.clone();
    page.insert_node(element)?;
    Ok(id)
}

impl Page {
    /// Insert a serialized subtree as a detached element
    pub fn adopt(&mut self, record: ElementRecord) -> Result<ElementId, EditorError> {
        build(self, record, None)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, EditorError> {
        Ok(serde_json::to_value(serialize_page(self)?)?)
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self, EditorError> {
        let record: PageRecord = serde_json::from_value(json)?;
        deserialize_page(record)
    }
}
