use super::{ensure_page_and_element, lookup, CommandError, CommandState};
use crate::document::Document;
use crate::element::{ElementId, Location};
use crate::page::Page;
use tracing::warn;

/// Move an element to a new parent slot, or detach it when no parent is given
#[derive(Debug, Clone, PartialEq)]
pub struct ElementLocationCommand {
    pub(crate) page_id: String,
    pub(crate) element_id: ElementId,
    pub(crate) new_parent_id: Option<ElementId>,
    pub(crate) slot_id: Option<String>,
    pub(crate) index: Option<usize>,
    pub(crate) previous: Option<Location>,
    pub(crate) state: CommandState,
}

impl ElementLocationCommand {
    /// Build a move of `element_id` into `new_parent_id`'s slot at `index`.
    ///
    /// The slot defaults to the parent pattern's default slot and the index
    /// to the end of the slot. Fails if the move would make the element its
    /// own ancestor.
    pub fn new(
        doc: &Document,
        page_id: &str,
        element_id: &str,
        new_parent_id: Option<&str>,
        slot_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<Self, CommandError> {
        let page = lookup(doc, page_id, element_id)?;
        if element_id == page.root_id() {
            return Err(CommandError::RootElement(element_id.to_string()));
        }

        let slot_id = match new_parent_id {
            Some(parent_id) => {
                if page.node(parent_id).is_none() {
                    return Err(CommandError::ElementNotFound(parent_id.to_string()));
                }
                if page.is_ancestor_of(element_id, parent_id) {
                    return Err(CommandError::Cycle {
                        element: element_id.to_string(),
                        parent: parent_id.to_string(),
                    });
                }
                Some(
                    slot_id
                        .map(str::to_string)
                        .unwrap_or_else(|| doc.default_slot(page_id, parent_id)),
                )
            }
            None => None,
        };

        Ok(Self {
            page_id: page_id.to_string(),
            element_id: element_id.to_string(),
            new_parent_id: new_parent_id.map(str::to_string),
            slot_id,
            index,
            previous: page.location_of(element_id),
            state: CommandState::Unexecuted,
        })
    }

    /// Build a detach (delete) of `element_id`
    pub fn remove(doc: &Document, page_id: &str, element_id: &str) -> Result<Self, CommandError> {
        Self::new(doc, page_id, element_id, None, None, None)
    }

    pub fn new_parent_id(&self) -> Option<&str> {
        self.new_parent_id.as_deref()
    }

    /// Location the element had before the last execute
    pub fn previous_location(&self) -> Option<&Location> {
        self.previous.as_ref()
    }

    pub(crate) fn referenced_elements(&self) -> Vec<&str> {
        let mut ids = vec![self.element_id.as_str()];
        ids.extend(self.new_parent_id.as_deref());
        ids.extend(self.previous.as_ref().map(|l| l.parent_id.as_str()));
        ids
    }

    pub(crate) fn execute(&mut self, doc: &mut Document) -> bool {
        let Some(page) = ensure_page_and_element(doc, &self.page_id, &self.element_id) else {
            return false;
        };

        if let Some(parent_id) = &self.new_parent_id {
            if page.node(parent_id).is_none() {
                warn!(element_id = %parent_id, "Target parent not found");
                return false;
            }
            if page.is_ancestor_of(&self.element_id, parent_id) {
                warn!(element_id = %self.element_id, parent_id = %parent_id, "Refusing move that creates a cycle");
                return false;
            }
        }

        // Capture where the element is right now, not where it was at
        // construction; the tree may have changed in between
        self.previous = page.location_of(&self.element_id);

        let result = match &self.new_parent_id {
            Some(parent_id) => page.add_child(parent_id, &self.element_id, self.slot_id.as_deref(), self.index),
            None => page.remove(&self.element_id),
        };
        applied(page, result)
    }

    pub(crate) fn undo(&mut self, doc: &mut Document) -> bool {
        let Some(page) = ensure_page_and_element(doc, &self.page_id, &self.element_id) else {
            return false;
        };

        let result = match &self.previous {
            Some(location) => {
                if page.node(&location.parent_id).is_none() {
                    warn!(element_id = %location.parent_id, "Previous parent not found");
                    return false;
                }
                page.add_child(
                    &location.parent_id,
                    &self.element_id,
                    Some(&location.slot_id),
                    Some(location.index),
                )
            }
            None => page.remove(&self.element_id),
        };
        applied(page, result)
    }
}

fn applied(page: &Page, result: Result<(), crate::EditorError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(page_id = %page.id(), error = %e, "Structural change failed");
            false
        }
    }
}
