use super::{ensure_page_and_element, lookup, CommandError, CommandState};
use crate::document::Document;
use crate::element::ElementId;
use crate::value::Value;
use tracing::warn;

/// Set a property value, optionally addressed into a nested object by path
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValueCommand {
    pub(crate) page_id: String,
    pub(crate) element_id: ElementId,
    pub(crate) property_id: String,
    pub(crate) path: Option<String>,
    pub(crate) value: Value,
    pub(crate) previous_value: Option<Value>,
    pub(crate) sealed: bool,
    pub(crate) state: CommandState,
}

impl PropertyValueCommand {
    pub fn new(
        doc: &Document,
        page_id: &str,
        element_id: &str,
        property_id: &str,
        value: impl Into<Value>,
        path: Option<&str>,
    ) -> Result<Self, CommandError> {
        let page = lookup(doc, page_id, element_id)?;
        let previous_value = page
            .node(element_id)
            .and_then(|e| e.property_value(property_id, path))
            .cloned();

        Ok(Self {
            page_id: page_id.to_string(),
            element_id: element_id.to_string(),
            property_id: property_id.to_string(),
            path: path.map(str::to_string),
            value: value.into(),
            previous_value,
            sealed: false,
            state: CommandState::Unexecuted,
        })
    }

    pub fn property_id(&self) -> &str {
        &self.property_id
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Value restored by undo; `None` when the property had no value
    pub fn previous_value(&self) -> Option<&Value> {
        self.previous_value.as_ref()
    }

    /// Stop later edits of the same property from merging into this one
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub(crate) async fn execute(&mut self, doc: &mut Document) -> bool {
        if ensure_page_and_element(doc, &self.page_id, &self.element_id).is_none() {
            return false;
        }

        // Unknown pattern or property leaves the value alone; that is not a
        // structural failure
        doc.set_property_value(
            &self.page_id,
            &self.element_id,
            &self.property_id,
            self.value.clone(),
            self.path.as_deref(),
        )
        .await;
        true
    }

    pub(crate) fn undo(&mut self, doc: &mut Document) -> bool {
        if ensure_page_and_element(doc, &self.page_id, &self.element_id).is_none() {
            return false;
        }

        match doc.restore_property(
            &self.page_id,
            &self.element_id,
            &self.property_id,
            self.path.as_deref(),
            self.previous_value.clone(),
        ) {
            Ok(()) => true,
            Err(e) => {
                warn!(element_id = %self.element_id, error = %e, "Restoring property failed");
                false
            }
        }
    }
}
