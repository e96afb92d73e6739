//! Integration tests for editor crate

mod common;

use common::{Fixture, PAGE};
use trellis_editor::{
    calculate_drop_index, walk_element, walk_page, EditHistory, Element, ElementLocationCommand, Page,
    PatternLibrary, PropertyValueCommand, StaticPatternLibrary, Value, Visitor,
};

#[tokio::test]
async fn test_box_text_scenario() {
    let mut fx = Fixture::new();
    let root = fx.root.clone();
    let text = fx.create("text");

    let command =
        ElementLocationCommand::new(fx.session.document(), PAGE, &text, Some(&root), Some("children"), Some(0))
            .unwrap();
    assert!(fx.session.execute(command).await);
    assert_eq!(fx.page().children(&root, "children"), &[text.clone()]);

    assert!(fx.session.undo().await);
    assert!(fx.page().children(&root, "children").is_empty());
}

#[tokio::test]
async fn test_drag_reorder_within_container() {
    let mut fx = Fixture::new();
    let root = fx.root.clone();
    let mut ids = Vec::new();
    for _ in 0..5 {
        let id = fx.create("text");
        let command = ElementLocationCommand::new(fx.session.document(), PAGE, &id, Some(&root), None, None).unwrap();
        fx.session.execute(command).await;
        ids.push(id);
    }

    // Drop ids[1] onto ids[3]: it should end up where ids[3] was displayed
    let index = calculate_drop_index(fx.page(), &ids[1], &ids[3]).unwrap();
    assert_eq!(index, 2);

    let command =
        ElementLocationCommand::new(fx.session.document(), PAGE, &ids[1], Some(&root), None, Some(index)).unwrap();
    fx.session.execute(command).await;
    assert_eq!(
        fx.children(&root),
        vec![ids[0].clone(), ids[2].clone(), ids[1].clone(), ids[3].clone(), ids[4].clone()]
    );

    fx.session.undo().await;
    assert_eq!(fx.children(&root), ids);
}

#[tokio::test]
async fn test_drop_new_element_from_outside() {
    let mut fx = Fixture::new();
    let root = fx.root.clone();
    let existing = fx.create("text");
    let command = ElementLocationCommand::new(fx.session.document(), PAGE, &existing, Some(&root), None, None).unwrap();
    fx.session.execute(command).await;

    let fresh = fx.create("text");
    let index = calculate_drop_index(fx.page(), &fresh, &existing).unwrap();
    assert_eq!(index, 0);

    let command =
        ElementLocationCommand::new(fx.session.document(), PAGE, &fresh, Some(&root), None, Some(index)).unwrap();
    fx.session.execute(command).await;
    assert_eq!(fx.children(&root), vec![fresh, existing]);
}

#[tokio::test]
async fn test_checkpoints_across_edits() {
    let mut fx = Fixture::new();
    let root = fx.root.clone();
    let text = fx.create("text");

    fx.session.checkpoint().await.unwrap();
    let command = ElementLocationCommand::new(fx.session.document(), PAGE, &text, Some(&root), None, None).unwrap();
    fx.session.execute(command).await;
    let command = PropertyValueCommand::new(fx.session.document(), PAGE, &text, "size", 30.0, None).unwrap();
    fx.session.execute(command).await;
    fx.session.checkpoint().await.unwrap();
    // Unchanged document does not add a snapshot
    fx.session.checkpoint().await.unwrap();
    assert_eq!(fx.session.snapshots().len(), 2);

    assert!(fx.session.restore_previous().await.unwrap());
    assert!(fx.children(&root).is_empty());
    assert!(!fx.session.can_undo());

    assert!(fx.session.restore_next().await.unwrap());
    let element = fx.page().element(&text).unwrap();
    assert_eq!(element.property_value("size", None), Some(&Value::Number(30.0)));
}

#[test]
fn test_snapshot_history_shares_edit_history() {
    let mut history: EditHistory<&str> = EditHistory::new();
    for item in ["A", "B", "C"] {
        history.push(item);
    }
    history.back();
    history.back();
    history.push("D");

    assert_eq!(history.items(), &["A", "D"]);
    assert_eq!(history.pointer(), Some(1));
}

#[test]
fn test_pattern_library_from_json() {
    let source = r#"[
        {
            "id": "button",
            "name": "Button",
            "properties": [
                { "id": "label", "name": "Label", "type": "string", "defaultValue": "Click" },
                { "id": "variant", "name": "Variant", "type": "enum",
                  "options": [{ "id": "primary", "name": "Primary" }] }
            ],
            "slots": [{ "id": "icon", "name": "Icon", "default": true }]
        }
    ]"#;

    let library = StaticPatternLibrary::from_json(source).unwrap();
    assert_eq!(library.len(), 1);

    let button = library.pattern("button").unwrap();
    assert_eq!(button.default_slot(), "icon");

    let mut page = Page::new("p", "P", &button);
    let root = page.root_id().to_string();
    let child = page.create_element(&button);
    page.add_child(&root, &child, Some(button.default_slot()), None).unwrap();

    assert_eq!(page.children(&root, "icon"), &[child.clone()]);
    assert_eq!(page.node(&child).unwrap().name(), "Button");
    assert_eq!(
        page.node(&child).unwrap().property_value("label", None),
        Some(&Value::from("Click"))
    );
    assert!(page.node(&child).unwrap().property_value("variant", None).is_none());
}

#[derive(Default)]
struct DepthCounter {
    deepest: usize,
    elements: usize,
}

impl Visitor for DepthCounter {
    fn visit_element(&mut self, page: &Page, element: &Element, depth: usize) {
        self.deepest = self.deepest.max(depth);
        self.elements += 1;
        walk_element(self, page, element, depth);
    }
}

#[tokio::test]
async fn test_visitor_sees_attached_tree_only() {
    let mut fx = Fixture::new();
    let root = fx.root.clone();
    let frame = fx.create("box");
    let text = fx.create("text");
    let _detached = fx.create("text");

    let command = ElementLocationCommand::new(fx.session.document(), PAGE, &frame, Some(&root), None, None).unwrap();
    fx.session.execute(command).await;
    let command = ElementLocationCommand::new(fx.session.document(), PAGE, &text, Some(&frame), None, None).unwrap();
    fx.session.execute(command).await;

    let mut counter = DepthCounter::default();
    walk_page(&mut counter, fx.page());
    assert_eq!(counter.elements, 3);
    assert_eq!(counter.deepest, 2);
    assert_eq!(fx.page().arena_len(), 4);
}
