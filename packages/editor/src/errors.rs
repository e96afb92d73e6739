//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(#[from] trellis_common::CommonError),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Pattern not found: {0}")]
    PatternNotFound(String),

    #[error("The root element {0} has no parent")]
    RootElement(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
