//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;
use trellis_editor::{
    Document, EditSession, EnumOption, Page, Pattern, PatternLibrary, PatternProperty, PropertyKind,
    StaticPatternLibrary,
};

pub const PAGE: &str = "home";

pub fn library() -> Arc<StaticPatternLibrary> {
    let weight = PropertyKind::Enum {
        options: vec![
            EnumOption {
                id: "regular".to_string(),
                name: "Regular".to_string(),
            },
            EnumOption {
                id: "bold".to_string(),
                name: "Bold".to_string(),
            },
        ],
    };

    Arc::new(
        StaticPatternLibrary::new()
            .with_pattern(
                Pattern::new("box", "Box")
                    .with_slot("children", true)
                    .with_slot("overlay", false),
            )
            .with_pattern(
                Pattern::new("text", "Text")
                    .with_property(PatternProperty::new("content", PropertyKind::String).with_default("Text"))
                    .with_property(PatternProperty::new("size", PropertyKind::Number).with_default(12.0))
                    .with_property(PatternProperty::new(
                        "style",
                        PropertyKind::Object {
                            fields: vec![
                                PatternProperty::new("color", PropertyKind::String).with_default("black"),
                                PatternProperty::new("weight", weight),
                            ],
                        },
                    )),
            ),
    )
}

/// Session over one open page whose root is a `Box`
pub struct Fixture {
    pub session: EditSession,
    pub root: String,
}

impl Fixture {
    pub fn new() -> Self {
        let library = library();
        Self::with_document(Document::in_memory(library.clone()), &library)
    }

    pub fn with_document(mut document: Document, library: &StaticPatternLibrary) -> Self {
        let root_pattern = library.pattern("box").expect("box pattern");
        let page = Page::new(PAGE, "Home", &root_pattern);
        let root = page.root_id().to_string();
        document.add_page(page, "pages/home.json");

        Self {
            session: EditSession::new("test-client", document),
            root,
        }
    }

    /// Create a detached element on the page
    pub fn create(&mut self, pattern_id: &str) -> String {
        self.session
            .document_mut()
            .create_element(PAGE, pattern_id)
            .expect("element created")
    }

    pub fn page(&self) -> &Page {
        self.session.document().page(PAGE).expect("page is open")
    }

    pub fn children(&self, parent: &str) -> Vec<String> {
        self.page().children(parent, "children").to_vec()
    }
}
