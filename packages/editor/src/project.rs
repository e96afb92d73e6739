//! # Project
//!
//! A project is the list of pages sharing one pattern library. Pages are
//! referenced by id and stored separately, one JSON file each.

use crate::page::PageId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRef {
    pub id: PageId,
    pub name: String,
    /// Location handed to the persistence layer
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pages: Vec<PageRef>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pages: Vec::new(),
        }
    }

    pub fn page(&self, id: &str) -> Option<&PageRef> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Register a page, replacing any reference with the same id
    pub fn add_page(&mut self, page: PageRef) {
        match self.pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page,
            None => self.pages.push(page),
        }
    }

    pub fn remove_page(&mut self, id: &str) -> Option<PageRef> {
        let index = self.pages.iter().position(|p| p.id == id)?;
        Some(self.pages.remove(index))
    }
}
