//! # Document Snapshots
//!
//! Whole-document history at the application level. Each snapshot captures
//! the serialized form of every open page; the snapshots are kept in the
//! same pointer-list history used for commands.

use crate::edit_history::EditHistory;
use crate::serializer::PageRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub taken_at: DateTime<Utc>,
    pub pages: Vec<PageRecord>,
}

impl DocumentSnapshot {
    pub fn new(pages: Vec<PageRecord>) -> Self {
        Self {
            taken_at: Utc::now(),
            pages,
        }
    }

    /// Same page contents, ignoring when each was taken
    pub fn same_contents(&self, other: &DocumentSnapshot) -> bool {
        self.pages == other.pages
    }
}

pub type SnapshotHistory = EditHistory<DocumentSnapshot>;
