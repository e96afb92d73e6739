use crate::element::{Element, ElementId};
use crate::page::Page;
use crate::value::Value;

/// Visitor pattern for walking a page tree immutably
///
/// Default implementations walk the entire tree through the children lists.
/// Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_element(&mut self, page: &Page, element: &Element, depth: usize) {
        walk_element(self, page, element, depth);
    }

    fn visit_slot(&mut self, page: &Page, element: &Element, slot_id: &str, children: &[ElementId], depth: usize) {
        walk_slot(self, page, element, slot_id, children, depth);
    }

    fn visit_property(&mut self, _element: &Element, _property_id: &str, _value: &Value) {
        // Leaf, nothing to walk
    }
}

pub fn walk_page<V: Visitor>(visitor: &mut V, page: &Page) {
    if let Some(root) = page.root() {
        visitor.visit_element(page, root, 0);
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, page: &Page, element: &Element, depth: usize) {
    for (property_id, value) in element.properties() {
        visitor.visit_property(element, property_id, value);
    }
    for (slot_id, children) in element.slots() {
        visitor.visit_slot(page, element, slot_id, children, depth);
    }
}

pub fn walk_slot<V: Visitor>(
    visitor: &mut V,
    page: &Page,
    _element: &Element,
    _slot_id: &str,
    children: &[ElementId],
    depth: usize,
) {
    for child_id in children {
        if let Some(child) = page.node(child_id) {
            visitor.visit_element(page, child, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Pattern, PatternProperty, PropertyKind};

    #[derive(Default)]
    struct Outline {
        lines: Vec<String>,
        properties: usize,
    }

    impl Visitor for Outline {
        fn visit_element(&mut self, page: &Page, element: &Element, depth: usize) {
            self.lines.push(format!("{}{}", "  ".repeat(depth), element.name()));
            walk_element(self, page, element, depth);
        }

        fn visit_property(&mut self, _element: &Element, _property_id: &str, _value: &Value) {
            self.properties += 1;
        }
    }

    #[test]
    fn test_walk_in_child_order() {
        let container = Pattern::new("box", "Box").with_slot("children", true);
        let text = Pattern::new("text", "Text")
            .with_property(PatternProperty::new("text", PropertyKind::String).with_default("Hi"));

        let mut page = Page::new("page", "Page", &container);
        let root = page.root_id().to_string();
        let inner = page.create_element(&container);
        let first = page.create_element(&text);
        let second = page.create_element(&text);
        page.add_child(&root, &inner, None, None).unwrap();
        page.add_child(&inner, &second, None, None).unwrap();
        page.add_child(&inner, &first, None, Some(0)).unwrap();
        page.set_name(&first, "First").unwrap();

        let mut outline = Outline::default();
        walk_page(&mut outline, &page);

        assert_eq!(outline.lines, vec!["Box", "  Box", "    First", "    Text"]);
        assert_eq!(outline.properties, 2);
    }
}
