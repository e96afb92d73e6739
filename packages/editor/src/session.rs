//! # Edit Session
//!
//! The one place edits enter the document. A session owns the document, the
//! command history and the snapshot history, and exposes exactly three
//! mutation entry points: `execute`, `undo` and `redo`.
//!
//! ## Failure policy
//!
//! When a command fails to resolve its page or elements, the document no
//! longer matches the history. The session then drops the whole undo/redo
//! buffer (never skipping just the failed step) and broadcasts
//! `EditorEvent::OutOfSync`.
//!
//! ## Undo/redo over one list
//!
//! The history pointer sits on the most recent executed command. Undo reverts
//! that command and steps back; at the first entry the pointer stays put and
//! the command is simply marked undone. Redo re-executes the entry under the
//! pointer if it is undone, otherwise steps forward and re-executes that.

use crate::commands::{try_merge, Command, CommandState, MergeOutcome};
use crate::edit_history::EditHistory;
use crate::element::ElementId;
use crate::snapshot::SnapshotHistory;
use crate::{Document, EditorError};
use std::collections::{HashMap, HashSet};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Change notifications for observers
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A page's tree or values changed
    Changed { page_id: String },
    /// A command could not be applied; the history was discarded
    OutOfSync { reason: String },
    /// Command history emptied
    HistoryCleared,
    /// Document replaced from a snapshot
    Restored,
}

pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    document: Document,
    history: EditHistory<Command>,
    snapshots: SnapshotHistory,
    events: broadcast::Sender<EditorEvent>,
}

impl EditSession {
    /// Create new edit session
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            id: id.into(),
            document,
            history: EditHistory::new(),
            snapshots: SnapshotHistory::new(),
            events,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Page lifecycle access (open, close, save). Element edits must go
    /// through `execute` so the history stays in step with the tree.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn history(&self) -> &EditHistory<Command> {
        &self.history
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.events.subscribe()
    }

    /// Execute a command and record it, merging with the previous entry
    /// where allowed. A command that already ran is refused and the history
    /// is left alone.
    pub async fn execute(&mut self, command: impl Into<Command>) -> bool {
        let mut command = command.into();
        if command.state() == CommandState::Executed {
            warn!(command = command.name(), "Command was already executed, ignoring it");
            return false;
        }
        self.document.settle().await;

        if !command.execute(&mut self.document).await {
            self.fail(format!("{} command could not be executed", command.name()));
            return false;
        }

        // Everything has been undone; a new edit starts a fresh timeline
        if self.history.pointer() == Some(0)
            && self.history.current().map(Command::state) == Some(CommandState::Undone)
        {
            self.history.clear();
        }

        let page_id = command.page_id().to_string();
        // Only the newest entry may absorb the command; with a redo tail the
        // push below has to truncate it
        let outcome = match self.history.current() {
            Some(previous) if !self.history.has_next() => try_merge(&mut command, previous),
            _ => MergeOutcome::Rejected,
        };

        match outcome {
            MergeOutcome::Merged => {
                debug!(command = command.name(), "Merged with previous command");
                self.history.replace_current(command);
            }
            MergeOutcome::Rejected => self.history.push(command),
        }

        self.notify(EditorEvent::Changed { page_id });
        true
    }

    /// Undo the most recent command. `false` when there was nothing to undo
    /// or the command failed.
    pub async fn undo(&mut self) -> bool {
        self.document.settle().await;

        let Some(command) = self.history.current_mut() else {
            return false;
        };
        if command.state() != CommandState::Executed {
            return false;
        }

        if !command.undo(&mut self.document).await {
            let reason = format!("{} command could not be undone", command.name());
            self.fail(reason);
            return false;
        }

        let page_id = command.page_id().to_string();
        if self.history.pointer().map_or(false, |p| p > 0) {
            self.history.back();
        }

        self.notify(EditorEvent::Changed { page_id });
        true
    }

    /// Redo the next undone command. `false` when there was nothing to redo
    /// or the command failed.
    pub async fn redo(&mut self) -> bool {
        self.document.settle().await;

        let current_undone = self.history.current().map(Command::state) == Some(CommandState::Undone);
        if !current_undone {
            if !self.history.has_next() {
                return false;
            }
            self.history.forward();
        }

        let Some(command) = self.history.current_mut() else {
            return false;
        };
        if command.state() != CommandState::Undone {
            return false;
        }

        if !command.execute(&mut self.document).await {
            let reason = format!("{} command could not be redone", command.name());
            self.fail(reason);
            return false;
        }

        let page_id = command.page_id().to_string();
        self.notify(EditorEvent::Changed { page_id });
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.current().map(Command::state) == Some(CommandState::Executed)
    }

    pub fn can_redo(&self) -> bool {
        self.history.current().map(Command::state) == Some(CommandState::Undone) || self.history.has_next()
    }

    /// Close the latest command to merging (e.g. when a text field loses focus)
    pub fn seal_current(&mut self) {
        if let Some(command) = self.history.current_mut() {
            command.seal();
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.notify(EditorEvent::HistoryCleared);
    }

    /// Drop detached elements no command in the history refers to
    pub fn collect_garbage(&mut self) -> usize {
        let mut retained: HashMap<String, HashSet<ElementId>> = HashMap::new();
        for command in self.history.iter() {
            let ids = retained.entry(command.page_id().to_string()).or_default();
            ids.extend(command.referenced_elements().into_iter().map(str::to_string));
        }

        let empty = HashSet::new();
        let page_ids: Vec<String> = self.document.open_pages().map(|p| p.id().to_string()).collect();
        page_ids
            .iter()
            .filter_map(|page_id| {
                let ids = retained.get(page_id).unwrap_or(&empty);
                self.document.page_mut(page_id).map(|page| page.collect_detached(ids))
            })
            .sum()
    }

    /// Record the current document in the snapshot history
    pub async fn checkpoint(&mut self) -> Result<(), EditorError> {
        self.document.settle().await;
        let snapshot = self.document.snapshot()?;

        if self
            .snapshots
            .current()
            .map_or(false, |current| current.same_contents(&snapshot))
        {
            return Ok(());
        }

        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Restore the snapshot before the current one
    pub async fn restore_previous(&mut self) -> Result<bool, EditorError> {
        let before = self.snapshots.pointer();
        self.snapshots.back();
        self.restore_current(before).await
    }

    /// Restore the snapshot after the current one
    pub async fn restore_next(&mut self) -> Result<bool, EditorError> {
        let before = self.snapshots.pointer();
        self.snapshots.forward();
        self.restore_current(before).await
    }

    pub fn snapshots(&self) -> &SnapshotHistory {
        &self.snapshots
    }

    async fn restore_current(&mut self, before: Option<usize>) -> Result<bool, EditorError> {
        if self.snapshots.pointer() == before {
            return Ok(false);
        }
        let Some(snapshot) = self.snapshots.current().cloned() else {
            return Ok(false);
        };

        self.document.settle().await;
        self.document.restore(&snapshot)?;

        // Commands describe edits relative to the replaced tree
        self.history.clear();
        info!(session_id = %self.id, "Restored document snapshot");
        self.notify(EditorEvent::Restored);
        Ok(true)
    }

    fn fail(&mut self, reason: String) {
        warn!(session_id = %self.id, reason = %reason, "Document out of sync, discarding history");
        self.history.clear();
        self.notify(EditorEvent::OutOfSync { reason });
    }

    fn notify(&self, event: EditorEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
