pub mod check;
pub mod init;
pub mod move_element;
pub mod rename;
pub mod tree;

pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use move_element::{move_element, MoveArgs};
pub use rename::{rename, RenameArgs};
pub use tree::{tree, TreeArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use trellis_common::JsonFilePersistence;
use trellis_editor::{Document, EditSession, StaticPatternLibrary};

/// A project on disk with an edit session over it
pub struct Workspace {
    pub config: Config,
    pub session: EditSession,
}

impl Workspace {
    pub fn open(cwd: &Path) -> Result<Self> {
        let config = Config::load(cwd)?;

        let patterns_path = config.patterns_path(cwd);
        let patterns = std::fs::read_to_string(&patterns_path)
            .with_context(|| format!("Cannot read pattern library {}", patterns_path.display()))?;
        let library = StaticPatternLibrary::from_json(&patterns)
            .with_context(|| format!("Invalid pattern library {}", patterns_path.display()))?;

        let persistence = JsonFilePersistence::new(cwd);
        let document = Document::load(&config.project_path(), Arc::new(library), Arc::new(persistence))
            .with_context(|| format!("Cannot load project {}", config.project_file))?;

        Ok(Self {
            config,
            session: EditSession::new("trellis-cli", document),
        })
    }

    pub fn page_ids(&self) -> Vec<String> {
        self.session
            .document()
            .project()
            .pages
            .iter()
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn open_page(&mut self, page_id: &str) -> Result<()> {
        self.session
            .document_mut()
            .open_page(page_id)
            .with_context(|| format!("Cannot open page {}", page_id))?;
        Ok(())
    }

    pub fn save_page(&self, page_id: &str) -> Result<()> {
        self.session.document().save_page(page_id)?;
        Ok(())
    }
}
