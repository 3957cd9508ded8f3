//! Error types for document parsing and mutation.

use thiserror::Error;

/// Errors returned while parsing or rewriting a property document.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The XML event stream is malformed.
    #[error("malformed document: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Serializing the document failed.
    #[error("failed to serialize document: {0}")]
    Io(#[from] std::io::Error),
    /// The document contains no root element.
    #[error("document has no root element")]
    MissingRoot,
}
