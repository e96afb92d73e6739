//! Merge rules for consecutive commands.
//!
//! A new command is only ever offered the history entry immediately before
//! it. Merging succeeds when both commands are of the same kind, target the
//! same element (and the same property and path for property edits), and the
//! older command is still open. The new command then takes over the older
//! one's captured previous state and replaces it in the history, so a single
//! undo reverts the whole run of edits.

use super::{Command, CommandState, ElementNameCommand, PropertyValueCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// `candidate` absorbed `previous` and should replace it
    Merged,
    /// Keep both; push `candidate` as a new entry
    Rejected,
}

pub fn try_merge(candidate: &mut Command, previous: &Command) -> MergeOutcome {
    if previous.state() != CommandState::Executed || previous.is_sealed() {
        return MergeOutcome::Rejected;
    }

    match (candidate, previous) {
        (Command::PropertyValue(next), Command::PropertyValue(prev)) if same_property(next, prev) => {
            next.previous_value = prev.previous_value.clone();
            MergeOutcome::Merged
        }
        (Command::ElementName(next), Command::ElementName(prev)) if same_element(next, prev) => {
            next.previous_name = prev.previous_name.clone();
            MergeOutcome::Merged
        }
        // Each move is its own step
        _ => MergeOutcome::Rejected,
    }
}

fn same_property(next: &PropertyValueCommand, prev: &PropertyValueCommand) -> bool {
    next.page_id == prev.page_id
        && next.element_id == prev.element_id
        && next.property_id == prev.property_id
        && next.path == prev.path
}

fn same_element(next: &ElementNameCommand, prev: &ElementNameCommand) -> bool {
    next.page_id == prev.page_id && next.element_id == prev.element_id
}
