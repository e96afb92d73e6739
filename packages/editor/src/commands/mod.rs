//! # Commands
//!
//! Reversible edits. Each command is a small state machine over one logical
//! edit:
//!
//! ```text
//! Unexecuted → Executed → Undone → Executed (redo) → ...
//! ```
//!
//! ## Design Principles
//!
//! 1. **Ids only**: commands store page and element ids, never references, and
//!    re-resolve them on every execute/undo. A page may have been closed and
//!    reopened since the command was built.
//! 2. **All or nothing**: when re-resolution fails, execute/undo return
//!    `false` without touching the document. The session then discards the
//!    whole history, because the document no longer matches it.
//! 3. **Closed set**: the command kinds are one enum, and merge rules live in
//!    a single function (`try_merge`).

mod location;
mod merge;
mod name;
mod property;

pub use location::ElementLocationCommand;
pub use merge::{try_merge, MergeOutcome};
pub use name::ElementNameCommand;
pub use property::PropertyValueCommand;

use crate::document::Document;
use crate::page::Page;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Page not open: {0}")]
    PageNotOpen(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Moving {element} into {parent} would create a cycle")]
    Cycle { element: String, parent: String },

    #[error("The root element {0} cannot be moved")]
    RootElement(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    #[default]
    Unexecuted,
    Executed,
    Undone,
}

/// A reversible edit
#[derive(Debug, Clone)]
pub enum Command {
    ElementLocation(ElementLocationCommand),
    PropertyValue(PropertyValueCommand),
    ElementName(ElementNameCommand),
}

impl Command {
    /// Get a debug name for this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::ElementLocation(_) => "element-location",
            Command::PropertyValue(_) => "property-value",
            Command::ElementName(_) => "element-name",
        }
    }

    pub fn page_id(&self) -> &str {
        match self {
            Command::ElementLocation(c) => &c.page_id,
            Command::PropertyValue(c) => &c.page_id,
            Command::ElementName(c) => &c.page_id,
        }
    }

    pub fn element_id(&self) -> &str {
        match self {
            Command::ElementLocation(c) => &c.element_id,
            Command::PropertyValue(c) => &c.element_id,
            Command::ElementName(c) => &c.element_id,
        }
    }

    pub fn state(&self) -> CommandState {
        match self {
            Command::ElementLocation(c) => c.state,
            Command::PropertyValue(c) => c.state,
            Command::ElementName(c) => c.state,
        }
    }

    /// Close the command to merging; the next edit starts a new undo step
    pub fn seal(&mut self) {
        match self {
            Command::ElementLocation(_) => {}
            Command::PropertyValue(c) => c.seal(),
            Command::ElementName(c) => c.seal(),
        }
    }

    pub fn is_sealed(&self) -> bool {
        match self {
            Command::ElementLocation(_) => true,
            Command::PropertyValue(c) => c.is_sealed(),
            Command::ElementName(c) => c.is_sealed(),
        }
    }

    /// Element ids this command may need to resolve again
    pub fn referenced_elements(&self) -> Vec<&str> {
        match self {
            Command::ElementLocation(c) => c.referenced_elements(),
            Command::PropertyValue(c) => vec![c.element_id.as_str()],
            Command::ElementName(c) => vec![c.element_id.as_str()],
        }
    }

    /// Apply the command. `false` means nothing was changed because the page
    /// or an element could not be resolved.
    pub async fn execute(&mut self, doc: &mut Document) -> bool {
        if self.state() == CommandState::Executed {
            debug!(command = self.name(), "Command already executed");
            return false;
        }

        let done = match self {
            Command::ElementLocation(c) => c.execute(doc),
            Command::PropertyValue(c) => c.execute(doc).await,
            Command::ElementName(c) => c.execute(doc),
        };

        if done {
            self.set_state(CommandState::Executed);
            debug!(command = self.name(), element_id = %self.element_id(), "Executed command");
        }
        done
    }

    /// Revert the command. `false` means nothing was changed.
    pub async fn undo(&mut self, doc: &mut Document) -> bool {
        if self.state() != CommandState::Executed {
            debug!(command = self.name(), "Command is not executed, nothing to undo");
            return false;
        }

        let done = match self {
            Command::ElementLocation(c) => c.undo(doc),
            Command::PropertyValue(c) => c.undo(doc),
            Command::ElementName(c) => c.undo(doc),
        };

        if done {
            self.set_state(CommandState::Undone);
            debug!(command = self.name(), element_id = %self.element_id(), "Undid command");
        }
        done
    }

    fn set_state(&mut self, state: CommandState) {
        match self {
            Command::ElementLocation(c) => c.state = state,
            Command::PropertyValue(c) => c.state = state,
            Command::ElementName(c) => c.state = state,
        }
    }
}

impl From<ElementLocationCommand> for Command {
    fn from(command: ElementLocationCommand) -> Self {
        Command::ElementLocation(command)
    }
}

impl From<PropertyValueCommand> for Command {
    fn from(command: PropertyValueCommand) -> Self {
        Command::PropertyValue(command)
    }
}

impl From<ElementNameCommand> for Command {
    fn from(command: ElementNameCommand) -> Self {
        Command::ElementName(command)
    }
}

/// Re-resolve the page and element a command targets
pub(crate) fn ensure_page_and_element<'a>(
    doc: &'a mut Document,
    page_id: &str,
    element_id: &str,
) -> Option<&'a mut Page> {
    doc.resolve(page_id, element_id)
}

/// Resolve the page and element once at construction time
pub(crate) fn lookup<'a>(
    doc: &'a Document,
    page_id: &str,
    element_id: &str,
) -> Result<&'a Page, CommandError> {
    let page = doc
        .page(page_id)
        .ok_or_else(|| CommandError::PageNotOpen(page_id.to_string()))?;
    if page.node(element_id).is_none() {
        return Err(CommandError::ElementNotFound(element_id.to_string()));
    }
    Ok(page)
}
