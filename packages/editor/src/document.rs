//! # Document Handle
//!
//! The store every edit goes through. A `Document` owns the project, the
//! currently open pages, the pattern library and the coercion queue, and is
//! passed explicitly to commands and sessions.
//!
//! ## Lifecycle
//!
//! ```text
//! open_page → edit (commands) → close_page
//!     ↓                             ↓
//!  load JSON                    save JSON
//! ```
//!
//! Pages can be closed and reopened at any time. Commands only hold ids and
//! re-resolve through `resolve` on every execute/undo, so they keep working
//! against the reopened page.

use crate::coercion::{CoercionOutcome, CoercionQueue, CoercionTicket, PropertyKey};
use crate::element::{Element, ElementId};
use crate::page::{Page, PageId};
use crate::pattern::{PatternLibrary, DEFAULT_SLOT};
use crate::project::{PageRef, Project};
use crate::serializer::{deserialize_page, serialize_page, PageRecord};
use crate::snapshot::DocumentSnapshot;
use crate::value::Value;
use crate::EditorError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use trellis_common::{MemoryPersistence, Persistence};

pub struct Document {
    project: Project,
    pages: HashMap<PageId, Page>,
    library: Arc<dyn PatternLibrary>,
    persistence: Arc<dyn Persistence>,
    coercions: CoercionQueue,

    /// Current version number (increments on each applied change)
    pub version: u64,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("project", &self.project.id)
            .field("open_pages", &self.pages.keys().collect::<Vec<_>>())
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Document {
    pub fn new(project: Project, library: Arc<dyn PatternLibrary>, persistence: Arc<dyn Persistence>) -> Self {
        Self {
            project,
            pages: HashMap::new(),
            library,
            persistence,
            coercions: CoercionQueue::new(),
            version: 0,
        }
    }

    /// Document backed by in-memory persistence (testing, scratch work)
    pub fn in_memory(library: Arc<dyn PatternLibrary>) -> Self {
        Self::new(
            Project::new("untitled", "Untitled"),
            library,
            Arc::new(MemoryPersistence::new()),
        )
    }

    /// Load the project file and keep pages closed until asked for
    pub fn load(
        project_path: &Path,
        library: Arc<dyn PatternLibrary>,
        persistence: Arc<dyn Persistence>,
    ) -> Result<Self, EditorError> {
        let project: Project = serde_json::from_value(persistence.load(project_path)?)?;
        info!(project_id = %project.id, pages = project.pages.len(), "Loaded project");
        Ok(Self::new(project, library, persistence))
    }

    pub fn save_project(&self, project_path: &Path) -> Result<(), EditorError> {
        self.persistence
            .save(project_path, &serde_json::to_value(&self.project)?)?;
        Ok(())
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn library(&self) -> &Arc<dyn PatternLibrary> {
        &self.library
    }

    /// Register a new page with the project and keep it open
    pub fn add_page(&mut self, page: Page, path: impl Into<PathBuf>) {
        self.project.add_page(PageRef {
            id: page.id().to_string(),
            name: page.name().to_string(),
            path: path.into(),
        });
        self.pages.insert(page.id().to_string(), page);
        self.version += 1;
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.get(page_id)
    }

    pub(crate) fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.get_mut(page_id)
    }

    pub fn open_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    pub fn is_open(&self, page_id: &str) -> bool {
        self.pages.contains_key(page_id)
    }

    /// Load a page from persistence unless it is already open
    pub fn open_page(&mut self, page_id: &str) -> Result<&Page, EditorError> {
        if !self.pages.contains_key(page_id) {
            let page_ref = self
                .project
                .page(page_id)
                .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))?;

            let json = self.persistence.load(&page_ref.path)?;
            let page = Page::from_json(json)?;
            info!(page_id = %page_id, elements = page.elements_by_id().len(), "Opened page");
            self.pages.insert(page_id.to_string(), page);
        }

        self.pages
            .get(page_id)
            .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))
    }

    /// Write a page to persistence
    pub fn save_page(&self, page_id: &str) -> Result<(), EditorError> {
        let page = self
            .pages
            .get(page_id)
            .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))?;
        let page_ref = self
            .project
            .page(page_id)
            .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))?;

        self.persistence.save(&page_ref.path, &page.to_json()?)?;
        debug!(page_id = %page_id, path = %page_ref.path.display(), "Saved page");
        Ok(())
    }

    /// Save and drop the live page. Detached elements are not persisted.
    pub fn close_page(&mut self, page_id: &str) -> Result<(), EditorError> {
        self.save_page(page_id)?;
        self.pages.remove(page_id);
        info!(page_id = %page_id, "Closed page");
        Ok(())
    }

    /// Resolve a page and one of its elements by id.
    ///
    /// The element may be attached or detached. Returns `None` when either is
    /// gone, e.g. after the page was closed.
    pub(crate) fn resolve(&mut self, page_id: &str, element_id: &str) -> Option<&mut Page> {
        let Some(page) = self.pages.get_mut(page_id) else {
            warn!(page_id = %page_id, "Page is not open");
            return None;
        };

        if page.node(element_id).is_none() {
            warn!(page_id = %page_id, element_id = %element_id, "Element not found");
            return None;
        }

        Some(page)
    }

    pub fn element(&self, page_id: &str, element_id: &str) -> Option<&Element> {
        self.pages.get(page_id)?.node(element_id)
    }

    /// Create a detached element on an open page from a library pattern.
    ///
    /// The tree is unchanged until a location command attaches the element.
    pub fn create_element(&mut self, page_id: &str, pattern_id: &str) -> Result<ElementId, EditorError> {
        let pattern = self
            .library
            .pattern(pattern_id)
            .ok_or_else(|| EditorError::PatternNotFound(pattern_id.to_string()))?;
        let page = self
            .pages
            .get_mut(page_id)
            .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))?;
        Ok(page.create_element(&pattern))
    }

    /// Slot that receives children of `element_id` when none is named
    pub fn default_slot(&self, page_id: &str, element_id: &str) -> String {
        self.element(page_id, element_id)
            .and_then(|e| e.pattern_id())
            .and_then(|id| self.library.pattern(id))
            .map(|pattern| pattern.default_slot().to_string())
            .unwrap_or_else(|| DEFAULT_SLOT.to_string())
    }

    /// Name an element gets when it has not been renamed: its pattern's name
    pub fn default_name(&self, page_id: &str, element_id: &str) -> Option<String> {
        let pattern_id = self.element(page_id, element_id)?.pattern_id()?;
        self.library.pattern(pattern_id).map(|pattern| pattern.name.clone())
    }

    /// Queue coercion of a raw value for a property.
    ///
    /// Unknown elements, patterns and properties are logged and ignored.
    pub fn submit_property_value(
        &mut self,
        page_id: &str,
        element_id: &str,
        property_id: &str,
        raw: Value,
        path: Option<&str>,
    ) -> Option<CoercionTicket> {
        let element = self.element(page_id, element_id)?;

        let Some(pattern_id) = element.pattern_id() else {
            warn!(element_id = %element_id, "Element has no pattern, ignoring property value");
            return None;
        };
        let Some(pattern) = self.library.pattern(pattern_id) else {
            warn!(element_id = %element_id, pattern_id = %pattern_id, "Unknown pattern, ignoring property value");
            return None;
        };
        let Some(property) = pattern.property(property_id, path) else {
            warn!(
                element_id = %element_id,
                pattern_id = %pattern_id,
                property_id = %property_id,
                path = ?path,
                "Unknown property, ignoring value"
            );
            return None;
        };

        let future = property.coerce_value(raw);
        let key = PropertyKey::new(page_id, element_id, property_id);
        Some(self.coercions.submit(key, path.map(str::to_string), future))
    }

    /// Coerce and store a property value, waiting for this property's queue
    /// to settle. Returns `false` when the value was ignored.
    pub async fn set_property_value(
        &mut self,
        page_id: &str,
        element_id: &str,
        property_id: &str,
        raw: Value,
        path: Option<&str>,
    ) -> bool {
        let Some(ticket) = self.submit_property_value(page_id, element_id, property_id, raw, path) else {
            return false;
        };
        self.settle_property(&ticket.key).await;
        true
    }

    /// Await all pending coercions and apply their results
    pub async fn settle(&mut self) {
        if self.coercions.pending() == 0 {
            return;
        }
        let outcomes = self.coercions.drain().await;
        self.apply_outcomes(outcomes);
    }

    pub async fn settle_property(&mut self, key: &PropertyKey) {
        let outcomes = self.coercions.drain_key(key).await;
        self.apply_outcomes(outcomes);
    }

    pub fn pending_coercions(&self) -> usize {
        self.coercions.pending()
    }

    fn apply_outcomes(&mut self, outcomes: Vec<CoercionOutcome>) {
        for outcome in outcomes {
            let key = &outcome.key;
            let value = match outcome.result {
                Ok(value) => value,
                Err(e) => {
                    warn!(
                        element_id = %key.element_id,
                        property_id = %key.property_id,
                        error = %e,
                        "Coercion failed, keeping previous value"
                    );
                    continue;
                }
            };

            let Some(page) = self.pages.get_mut(&key.page_id) else {
                warn!(page_id = %key.page_id, "Page closed before coercion settled");
                continue;
            };

            match page.write_property(&key.element_id, &key.property_id, outcome.path.as_deref(), value) {
                Ok(()) => {
                    self.version += 1;
                    debug!(
                        element_id = %key.element_id,
                        property_id = %key.property_id,
                        sequence = outcome.sequence,
                        "Applied property value"
                    );
                }
                Err(e) => warn!(error = %e, "Element vanished before coercion settled"),
            }
        }
    }

    /// Put back an already canonical value, bypassing coercion. `None`
    /// removes the property (or the nested value at `path`).
    pub(crate) fn restore_property(
        &mut self,
        page_id: &str,
        element_id: &str,
        property_id: &str,
        path: Option<&str>,
        value: Option<Value>,
    ) -> Result<(), EditorError> {
        let page = self
            .pages
            .get_mut(page_id)
            .ok_or_else(|| EditorError::PageNotFound(page_id.to_string()))?;
        match value {
            Some(value) => page.write_property(element_id, property_id, path, value)?,
            None => page.clear_property(element_id, property_id, path)?,
        }
        self.version += 1;
        Ok(())
    }

    /// Capture every open page
    pub fn snapshot(&self) -> Result<DocumentSnapshot, EditorError> {
        let mut pages: Vec<PageRecord> = self
            .pages
            .values()
            .map(serialize_page)
            .collect::<Result<_, _>>()?;
        pages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(DocumentSnapshot::new(pages))
    }

    /// Replace the open pages captured by `snapshot`
    pub fn restore(&mut self, snapshot: &DocumentSnapshot) -> Result<(), EditorError> {
        let pages = snapshot
            .pages
            .iter()
            .cloned()
            .map(deserialize_page)
            .collect::<Result<Vec<_>, _>>()?;

        for page in pages {
            self.pages.insert(page.id().to_string(), page);
        }
        self.version += 1;
        info!(taken_at = %snapshot.taken_at, "Restored snapshot");
        Ok(())
    }
}
