//! # Drop Index
//!
//! Where a dragged element has to be inserted so it ends up at the target's
//! position. Within one container the dragged element is removed before it
//! is inserted, which shifts every later sibling down by one; the insertion
//! index has to account for that. Callers remove first, then insert.

use crate::element::Location;
use crate::page::Page;

/// Insertion index for an element currently at `dragged` (or unparented)
/// dropped onto the element at `target`
pub fn drop_index(dragged: Option<&Location>, target: &Location) -> usize {
    match dragged {
        Some(dragged) if dragged.same_container(target) && dragged.index < target.index => {
            target.index - 1
        }
        _ => target.index,
    }
}

/// Insertion index for dropping `dragged_id` onto `target_id`.
///
/// `None` when the target has no parent (the root, or a detached element).
pub fn calculate_drop_index(page: &Page, dragged_id: &str, target_id: &str) -> Option<usize> {
    let target = page.location_of(target_id)?;
    let dragged = page.location_of(dragged_id);
    Some(drop_index(dragged.as_ref(), &target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    fn at(parent: &str, index: usize) -> Location {
        Location {
            parent_id: parent.to_string(),
            slot_id: "children".to_string(),
            index,
        }
    }

    #[test]
    fn test_same_container_forward_drag() {
        assert_eq!(drop_index(Some(&at("list", 2)), &at("list", 4)), 3);
    }

    #[test]
    fn test_same_container_backward_drag() {
        assert_eq!(drop_index(Some(&at("list", 4)), &at("list", 1)), 1);
        assert_eq!(drop_index(Some(&at("list", 3)), &at("list", 3)), 3);
    }

    #[test]
    fn test_cross_container_drag() {
        assert_eq!(drop_index(Some(&at("other", 2)), &at("list", 4)), 4);
    }

    #[test]
    fn test_same_parent_different_slot() {
        let mut dragged = at("list", 1);
        dragged.slot_id = "footer".to_string();
        assert_eq!(drop_index(Some(&dragged), &at("list", 4)), 4);
    }

    #[test]
    fn test_unparented_element() {
        assert_eq!(drop_index(None, &at("list", 0)), 0);
    }

    #[test]
    fn test_drop_lands_on_target_position() {
        let container = Pattern::new("box", "Box").with_slot("children", true);
        let mut page = Page::new("page", "Page", &container);
        let root = page.root_id().to_string();
        let ids: Vec<_> = (0..5)
            .map(|_| {
                let id = page.create_element(&container);
                page.add_child(&root, &id, None, None).unwrap();
                id
            })
            .collect();

        let index = calculate_drop_index(&page, &ids[2], &ids[4]).unwrap();
        assert_eq!(index, 3);

        page.remove(&ids[2]).unwrap();
        page.add_child(&root, &ids[2], None, Some(index)).unwrap();

        // Dragged element now sits directly before the target
        let children = page.children(&root, "children");
        assert_eq!(children, &[ids[0].clone(), ids[1].clone(), ids[3].clone(), ids[2].clone(), ids[4].clone()]);
        assert!(calculate_drop_index(&page, &ids[0], &root).is_none());
    }
}
