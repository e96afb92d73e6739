use super::{ensure_page_and_element, lookup, CommandError, CommandState};
use crate::document::Document;
use crate::element::ElementId;
use tracing::warn;

/// Rename an element. An empty name falls back to the element's default name.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNameCommand {
    pub(crate) page_id: String,
    pub(crate) element_id: ElementId,
    pub(crate) name: String,
    pub(crate) previous_name: String,
    pub(crate) fallback_name: String,
    pub(crate) sealed: bool,
    pub(crate) state: CommandState,
}

impl ElementNameCommand {
    pub fn new(
        doc: &Document,
        page_id: &str,
        element_id: &str,
        name: impl Into<String>,
    ) -> Result<Self, CommandError> {
        let page = lookup(doc, page_id, element_id)?;
        let previous_name = page
            .node(element_id)
            .map(|e| e.name().to_string())
            .unwrap_or_default();
        let fallback_name = doc
            .default_name(page_id, element_id)
            .unwrap_or_else(|| previous_name.clone());

        Ok(Self {
            page_id: page_id.to_string(),
            element_id: element_id.to_string(),
            name: name.into(),
            previous_name,
            fallback_name,
            sealed: false,
            state: CommandState::Unexecuted,
        })
    }

    /// Name the element ends up with after execute
    pub fn effective_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.fallback_name
        } else {
            &self.name
        }
    }

    pub fn previous_name(&self) -> &str {
        &self.previous_name
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub(crate) fn execute(&mut self, doc: &mut Document) -> bool {
        let name = self.effective_name().to_string();
        self.rename(doc, name)
    }

    pub(crate) fn undo(&mut self, doc: &mut Document) -> bool {
        let name = self.previous_name.clone();
        self.rename(doc, name)
    }

    fn rename(&self, doc: &mut Document, name: String) -> bool {
        let Some(page) = ensure_page_and_element(doc, &self.page_id, &self.element_id) else {
            return false;
        };

        match page.set_name(&self.element_id, name) {
            Ok(()) => {
                doc.version += 1;
                true
            }
            Err(e) => {
                warn!(element_id = %self.element_id, error = %e, "Rename failed");
                false
            }
        }
    }
}
