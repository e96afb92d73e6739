//! # Page
//!
//! A page is one editable document: a tree of elements hanging off a root.
//!
//! ## Storage
//!
//! Elements live in an arena keyed by id. Structure is expressed with id
//! lists (parent → children per slot) plus a back-link on each child. The
//! children lists are authoritative for traversal; the back-link only answers
//! "where am I" questions (`index_of`, `location_of`).
//!
//! `elements_by_id` indexes exactly the elements reachable from the root.
//! Removing an element drops it from the index but keeps it in the arena, so
//! a command holding its id can attach it again later. Detached elements that
//! nothing references any more are dropped by `collect_detached`.

use crate::element::{Element, ElementId, Location, ParentLink};
use crate::id_generator::IdGenerator;
use crate::pattern::{Pattern, DEFAULT_SLOT};
use crate::value::Value;
use crate::visitor::{walk_element, walk_page, Visitor};
use crate::EditorError;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub type PageId = String;

#[derive(Debug, Clone)]
pub struct Page {
    id: PageId,
    name: String,
    root_id: ElementId,
    arena: HashMap<ElementId, Element>,
    elements_by_id: HashSet<ElementId>,
    ids: IdGenerator,
}

impl Page {
    /// Create a page whose root is an instance of `root_pattern`
    pub fn new(id: impl Into<PageId>, name: impl Into<String>, root_pattern: &Pattern) -> Self {
        let id = id.into();
        let mut page = Self {
            ids: IdGenerator::new(&id),
            id,
            name: name.into(),
            root_id: String::new(),
            arena: HashMap::new(),
            elements_by_id: HashSet::new(),
        };

        let root_id = page.create_element(root_pattern);
        page.root_id = root_id.clone();
        page.elements_by_id.insert(root_id);
        page
    }

    /// Empty shell used while deserializing
    pub(crate) fn empty(id: impl Into<PageId>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            ids: IdGenerator::new(&id),
            id,
            name: name.into(),
            root_id: String::new(),
            arena: HashMap::new(),
            elements_by_id: HashSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn root(&self) -> Option<&Element> {
        self.arena.get(&self.root_id)
    }

    /// Look up an element attached to this page's tree
    pub fn element(&self, id: &str) -> Option<&Element> {
        if self.elements_by_id.contains(id) {
            self.arena.get(id)
        } else {
            None
        }
    }

    /// Look up an element whether attached or detached
    pub fn node(&self, id: &str) -> Option<&Element> {
        self.arena.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.arena.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements_by_id.contains(id)
    }

    /// Ids of every element reachable from the root
    pub fn elements_by_id(&self) -> &HashSet<ElementId> {
        &self.elements_by_id
    }

    /// Number of elements held, attached or not
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }

    /// Create a detached element from the pattern's default values
    pub fn create_element(&mut self, pattern: &Pattern) -> ElementId {
        let id = self.ids.new_id();
        let mut element = Element::new(id.clone(), pattern.name.clone(), Some(pattern.id.clone()));
        element.properties = pattern.default_properties();
        element.slots = pattern
            .slots
            .iter()
            .map(|slot| (slot.id.clone(), Vec::new()))
            .collect();

        debug!(element_id = %id, pattern_id = %pattern.id, "Created element");
        self.arena.insert(id.clone(), element);
        id
    }

    /// Insert an element built elsewhere (deserialization) into the arena, detached
    pub(crate) fn insert_node(&mut self, element: Element) -> Result<(), EditorError> {
        if self.arena.contains_key(&element.id) {
            return Err(EditorError::Serialization(format!(
                "duplicate element id {}",
                element.id
            )));
        }
        self.ids.observe(&element.id);
        self.arena.insert(element.id.clone(), element);
        Ok(())
    }

    pub(crate) fn set_root(&mut self, root_id: ElementId) {
        self.root_id = root_id;
        self.elements_by_id.clear();
        let reachable = self.subtree(&self.root_id);
        self.elements_by_id.extend(reachable);
    }

    /// Attach `child` to `parent`'s slot at `index`.
    ///
    /// Detaches `child` from its current parent first. `slot_id` defaults to
    /// the default slot, `index` to the end of the slot, and an index past the
    /// end is clamped. No cycle check happens here; callers verify
    /// `!is_ancestor_of(child, parent)` beforehand.
    pub fn add_child(
        &mut self,
        parent_id: &str,
        child_id: &str,
        slot_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<(), EditorError> {
        if !self.arena.contains_key(parent_id) {
            return Err(EditorError::ElementNotFound(parent_id.to_string()));
        }
        if !self.arena.contains_key(child_id) {
            return Err(EditorError::ElementNotFound(child_id.to_string()));
        }

        self.detach(child_id);

        let slot_id = slot_id.unwrap_or(DEFAULT_SLOT);
        let parent = self
            .arena
            .get_mut(parent_id)
            .ok_or_else(|| EditorError::ElementNotFound(parent_id.to_string()))?;
        let slot = parent.slots.entry(slot_id.to_string()).or_default();
        let index = index.unwrap_or(slot.len()).min(slot.len());
        slot.insert(index, child_id.to_string());

        if let Some(child) = self.arena.get_mut(child_id) {
            child.parent = Some(ParentLink {
                element_id: parent_id.to_string(),
                slot_id: slot_id.to_string(),
            });
        }

        if self.elements_by_id.contains(parent_id) {
            let subtree = self.subtree(child_id);
            self.elements_by_id.extend(subtree);
        }

        debug!(
            element_id = %child_id,
            parent_id = %parent_id,
            slot_id = %slot_id,
            index,
            "Attached element"
        );
        Ok(())
    }

    /// Detach an element from its parent and drop its subtree from the index.
    ///
    /// The element stays in the arena so it can be attached again.
    pub fn remove(&mut self, id: &str) -> Result<(), EditorError> {
        if id == self.root_id {
            return Err(EditorError::RootElement(id.to_string()));
        }
        if !self.arena.contains_key(id) {
            return Err(EditorError::ElementNotFound(id.to_string()));
        }

        self.detach(id);
        debug!(element_id = %id, "Removed element");
        Ok(())
    }

    fn detach(&mut self, id: &str) {
        let Some(link) = self.arena.get_mut(id).and_then(|e| e.parent.take()) else {
            return;
        };

        if let Some(slot) = self
            .arena
            .get_mut(&link.element_id)
            .and_then(|parent| parent.slots.get_mut(&link.slot_id))
        {
            slot.retain(|child| child != id);
        }

        for removed in self.subtree(id) {
            self.elements_by_id.remove(&removed);
        }
    }

    /// Position of the element in its current slot; `None` for the root or a
    /// detached element
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.location_of(id).map(|location| location.index)
    }

    pub fn location_of(&self, id: &str) -> Option<Location> {
        let link = self.arena.get(id)?.parent.as_ref()?;
        let index = self
            .arena
            .get(&link.element_id)?
            .slot(&link.slot_id)
            .iter()
            .position(|child| child == id)?;

        Some(Location {
            parent_id: link.element_id.clone(),
            slot_id: link.slot_id.clone(),
            index,
        })
    }

    pub fn parent_of(&self, id: &str) -> Option<&Element> {
        let link = self.arena.get(id)?.parent.as_ref()?;
        self.arena.get(&link.element_id)
    }

    /// Child ids of `id` in `slot_id`, empty when either is missing
    pub fn children(&self, id: &str, slot_id: &str) -> &[ElementId] {
        self.arena.get(id).map(|e| e.slot(slot_id)).unwrap_or(&[])
    }

    /// Whether `ancestor` is `candidate` or contains it.
    ///
    /// Walks down the children lists rather than trusting back-links.
    pub fn is_ancestor_of(&self, ancestor: &str, candidate: &str) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![ancestor];

        while let Some(current) = stack.pop() {
            if current == candidate {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(element) = self.arena.get(current) {
                for (_, children) in element.slots() {
                    stack.extend(children.iter().map(String::as_str));
                }
            }
        }

        false
    }

    pub fn is_descendant_of(&self, descendant: &str, candidate: &str) -> bool {
        self.is_ancestor_of(candidate, descendant)
    }

    /// `id` followed by all of its descendants, depth first
    pub fn subtree(&self, id: &str) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![id.to_string()];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(element) = self.arena.get(&current) {
                for (_, children) in element.slots().collect::<Vec<_>>().into_iter().rev() {
                    stack.extend(children.iter().rev().cloned());
                }
                out.push(current);
            }
        }

        out
    }

    pub(crate) fn set_name(&mut self, id: &str, name: impl Into<String>) -> Result<(), EditorError> {
        let element = self
            .arena
            .get_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.name = name.into();
        Ok(())
    }

    pub(crate) fn write_property(
        &mut self,
        id: &str,
        property_id: &str,
        path: Option<&str>,
        value: Value,
    ) -> Result<(), EditorError> {
        let element = self
            .arena
            .get_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.write_property(property_id, path, value);
        Ok(())
    }

    pub(crate) fn clear_property(
        &mut self,
        id: &str,
        property_id: &str,
        path: Option<&str>,
    ) -> Result<(), EditorError> {
        let element = self
            .arena
            .get_mut(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        element.clear_property(property_id, path);
        Ok(())
    }

    /// Drop detached elements unless they belong to a retained subtree.
    ///
    /// Returns the number of elements dropped.
    pub fn collect_detached(&mut self, retained: &HashSet<ElementId>) -> usize {
        let mut keep: HashSet<ElementId> = self.elements_by_id.clone();
        for id in retained {
            if self.arena.contains_key(id) {
                keep.extend(self.subtree(id));
            }
        }

        let before = self.arena.len();
        self.arena.retain(|id, _| keep.contains(id));
        let dropped = before - self.arena.len();

        if dropped > 0 {
            debug!(page_id = %self.id, dropped, "Collected detached elements");
        }
        dropped
    }

    /// Verify the structural invariants of the tree.
    ///
    /// Every attached element has exactly one parent whose slot lists it,
    /// no element is reachable twice, and `elements_by_id` is exactly the set
    /// of elements reachable from the root.
    pub fn check_integrity(&self) -> Result<(), EditorError> {
        let mut checker = IntegrityChecker::default();
        walk_page(&mut checker, self);

        if let Some(problem) = checker.problems.first() {
            return Err(EditorError::Serialization(problem.clone()));
        }

        if checker.seen != self.elements_by_id {
            return Err(EditorError::Serialization(format!(
                "index holds {} elements but {} are reachable",
                self.elements_by_id.len(),
                checker.seen.len()
            )));
        }

        if let Some(root) = self.root() {
            if root.parent.is_some() {
                return Err(EditorError::Serialization("root has a parent".to_string()));
            }
        }

        Ok(())
    }
}

#[derive(Default)]
struct IntegrityChecker {
    seen: HashSet<ElementId>,
    problems: Vec<String>,
}

impl Visitor for IntegrityChecker {
    fn visit_element(&mut self, page: &Page, element: &Element, depth: usize) {
        if !self.seen.insert(element.id.clone()) {
            self.problems
                .push(format!("element {} is reachable more than once", element.id));
            return;
        }

        for (slot_id, children) in element.slots() {
            for child_id in children {
                let linked = page
                    .node(child_id)
                    .and_then(|child| child.parent.as_ref())
                    .map(|link| link.element_id == element.id && link.slot_id == slot_id)
                    .unwrap_or(false);
                if !linked {
                    self.problems.push(format!(
                        "element {} in slot {} of {} has a stale parent link",
                        child_id, slot_id, element.id
                    ));
                }
            }
        }

        walk_element(self, page, element, depth);
    }
}
