//! # Edit History
//!
//! Undo/redo buffer shared by element commands and document snapshots.
//!
//! ## Design
//!
//! - One ordered list plus a pointer, not separate undo and redo stacks
//! - The pointer marks the current item; moving it back and forth walks the
//!   timeline without dropping anything
//! - Pushing while the pointer is behind the end drops the stale future
//!   before appending, so redo never resurrects a diverged timeline
//!
//! ## Example
//!
//! ```rust
//! use trellis_editor::EditHistory;
//!
//! let mut history = EditHistory::new();
//! history.push("A");
//! history.push("B");
//! history.push("C");
//! history.back();
//! history.back();
//! history.push("D");
//!
//! assert_eq!(history.items(), &["A", "D"]);
//! assert_eq!(history.current(), Some(&"D"));
//! ```

#[derive(Debug, Clone)]
pub struct EditHistory<T> {
    items: Vec<T>,
    pointer: Option<usize>,
}

impl<T> EditHistory<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            pointer: None,
        }
    }

    /// Append an item after the current one, dropping anything past it
    pub fn push(&mut self, item: T) {
        if let Some(pointer) = self.resolved_pointer() {
            self.items.truncate(pointer + 1);
        }

        self.items.push(item);
        self.pointer = Some(self.items.len() - 1);
    }

    /// Move the pointer one item back; stays on the first item
    pub fn back(&mut self) -> Option<&T> {
        let pointer = self.resolved_pointer()?;
        self.pointer = Some(pointer.saturating_sub(1));
        self.current()
    }

    /// Move the pointer one item forward; stays on the last item
    pub fn forward(&mut self) -> Option<&T> {
        let pointer = self.resolved_pointer()?;
        self.pointer = Some((pointer + 1).min(self.items.len() - 1));
        self.current()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.pointer = None;
    }

    /// Item under the pointer (the last item when the pointer is unset)
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.resolved_pointer()?)
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        let pointer = self.resolved_pointer()?;
        self.items.get_mut(pointer)
    }

    /// Swap the item under the pointer, returning the old one
    pub fn replace_current(&mut self, item: T) -> Option<T> {
        let current = self.current_mut()?;
        Some(std::mem::replace(current, item))
    }

    pub fn pointer(&self) -> Option<usize> {
        self.resolved_pointer()
    }

    pub fn has_next(&self) -> bool {
        self.resolved_pointer()
            .map_or(false, |pointer| pointer + 1 < self.items.len())
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn resolved_pointer(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.pointer.unwrap_or(self.items.len() - 1))
    }
}

impl<T> Default for EditHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}
