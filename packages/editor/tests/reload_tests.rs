//! Commands keep working after their page is closed and opened again

mod common;

use common::{library, Fixture, PAGE};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use trellis_common::{JsonFilePersistence, Persistence};
use trellis_editor::{Document, EditorEvent, ElementLocationCommand, Project, PropertyValueCommand, Value};

fn on_disk(dir: &TempDir) -> (Fixture, Arc<JsonFilePersistence>) {
    let library = library();
    let persistence = Arc::new(JsonFilePersistence::new(dir.path()));
    let document = Document::new(Project::new("site", "Site"), library.clone(), persistence.clone());
    (Fixture::with_document(document, &library), persistence)
}

fn reload(fx: &mut Fixture) {
    let document = fx.session.document_mut();
    document.close_page(PAGE).unwrap();
    assert!(!document.is_open(PAGE));
    document.open_page(PAGE).unwrap();
}

#[tokio::test]
async fn test_undo_after_reload() {
    let dir = TempDir::new().unwrap();
    let (mut fx, _) = on_disk(&dir);
    let root = fx.root.clone();
    let text = fx.create("text");

    let command = ElementLocationCommand::new(fx.session.document(), PAGE, &text, Some(&root), None, None).unwrap();
    assert!(fx.session.execute(command).await);

    reload(&mut fx);
    assert_eq!(fx.children(&root), vec![text.clone()]);

    assert!(fx.session.undo().await);
    assert!(fx.children(&root).is_empty());
    fx.page().check_integrity().unwrap();

    assert!(fx.session.redo().await);
    assert_eq!(fx.children(&root), vec![text]);
}

#[tokio::test]
async fn test_property_edit_survives_reload() {
    let dir = TempDir::new().unwrap();
    let (mut fx, persistence) = on_disk(&dir);
    let root = fx.root.clone();
    let text = fx.create("text");

    let command = ElementLocationCommand::new(fx.session.document(), PAGE, &text, Some(&root), None, None).unwrap();
    fx.session.execute(command).await;
    let command =
        PropertyValueCommand::new(fx.session.document(), PAGE, &text, "content", "Welcome", None).unwrap();
    fx.session.execute(command).await;

    reload(&mut fx);
    let element = fx.page().element(&text).unwrap();
    assert_eq!(element.property_value("content", None), Some(&Value::from("Welcome")));

    assert!(fx.session.undo().await);
    let element = fx.page().element(&text).unwrap();
    assert_eq!(element.property_value("content", None), Some(&Value::from("Text")));

    fx.session.document().save_page(PAGE).unwrap();
    let json = persistence.load(Path::new("pages/home.json")).unwrap();
    assert_eq!(json["root"]["_type"], "pattern");
    assert_eq!(json["root"]["children"][0]["properties"]["content"], "Text");
}

#[tokio::test]
async fn test_deleted_element_is_lost_on_reload() {
    let dir = TempDir::new().unwrap();
    let (mut fx, _) = on_disk(&dir);
    let root = fx.root.clone();
    let text = fx.create("text");
    let mut events = fx.session.subscribe();

    let command = ElementLocationCommand::new(fx.session.document(), PAGE, &text, Some(&root), None, None).unwrap();
    fx.session.execute(command).await;
    let command = ElementLocationCommand::remove(fx.session.document(), PAGE, &text).unwrap();
    fx.session.execute(command).await;

    // Detached elements are not persisted, so the delete cannot be undone
    reload(&mut fx);
    assert!(fx.page().node(&text).is_none());
    assert!(!fx.session.undo().await);
    assert!(fx.session.history().is_empty());

    let reasons: Vec<EditorEvent> = std::iter::from_fn(|| events.try_recv().ok()).collect();
    assert!(matches!(reasons.last(), Some(EditorEvent::OutOfSync { .. })));
}

#[tokio::test]
async fn test_project_reload_from_disk() {
    let dir = TempDir::new().unwrap();
    let (mut fx, persistence) = on_disk(&dir);
    let root = fx.root.clone();
    let text = fx.create("text");

    let command = ElementLocationCommand::new(fx.session.document(), PAGE, &text, Some(&root), None, None).unwrap();
    fx.session.execute(command).await;
    fx.session.document().save_project(Path::new("project.json")).unwrap();
    fx.session.document().save_page(PAGE).unwrap();

    let mut document = Document::load(Path::new("project.json"), library(), persistence).unwrap();
    assert_eq!(document.project().pages.len(), 1);
    assert!(!document.is_open(PAGE));

    let page = document.open_page(PAGE).unwrap();
    assert_eq!(page.children(&root, "children"), &[text.clone()]);

    // New ids never collide with loaded ones
    let fresh = document.create_element(PAGE, "text").unwrap();
    assert_ne!(fresh, text);
    assert_ne!(fresh, root);
}
