//! # Trellis Editor
//!
//! Editable document model with reversible commands and undo/redo.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ pattern library: element templates          │
//! │  - properties with async coercion           │
//! │  - named slots                              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: project + open pages              │
//! │  - element arena per page                   │
//! │  - JSON persistence, close/reopen           │
//! │  - per-property coercion lanes              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: commands + history                 │
//! │  - execute / undo / redo                    │
//! │  - merge consecutive edits                  │
//! │  - discard history when out of sync         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Commands hold ids**: pages may be closed and reopened between edits
//! 2. **Children lists are authoritative**: parent links are back-references
//! 3. **Latest value wins**: coercions of one property apply in submission order
//! 4. **All or nothing history**: a failed command discards undo and redo
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trellis_editor::{Document, EditSession, ElementLocationCommand, PropertyValueCommand};
//!
//! let mut session = EditSession::new("client-1", document);
//!
//! let command = ElementLocationCommand::new(session.document(), "home", &text, Some(&root), None, None)?;
//! session.execute(command).await;
//!
//! let command = PropertyValueCommand::new(session.document(), "home", &text, "content", "Hello", None)?;
//! session.execute(command).await;
//!
//! session.undo().await;
//! session.redo().await;
//! ```

mod coercion;
mod commands;
mod document;
mod drop_index;
mod edit_history;
mod element;
mod errors;
mod id_generator;
mod page;
mod pattern;
mod project;
mod serializer;
mod session;
mod snapshot;
mod value;
mod visitor;

pub use coercion::{CoercionOutcome, CoercionQueue, CoercionTicket, PropertyKey};
pub use commands::{
    try_merge, Command, CommandError, CommandState, ElementLocationCommand, ElementNameCommand, MergeOutcome,
    PropertyValueCommand,
};
pub use document::Document;
pub use drop_index::{calculate_drop_index, drop_index};
pub use edit_history::EditHistory;
pub use element::{Element, ElementId, Location, ParentLink};
pub use errors::EditorError;
pub use id_generator::{page_seed, IdGenerator};
pub use page::{Page, PageId};
pub use pattern::{
    CoercionError, EnumOption, Pattern, PatternLibrary, PatternProperty, PatternSlot, PropertyKind,
    StaticPatternLibrary, DEFAULT_SLOT,
};
pub use project::{PageRef, Project};
pub use serializer::{deserialize_page, serialize_element, serialize_page, ElementRecord, PageRecord, RecordKind};
pub use session::{EditSession, EditorEvent};
pub use snapshot::{DocumentSnapshot, SnapshotHistory};
pub use value::Value;
pub use visitor::{walk_element, walk_page, walk_slot, Visitor};
