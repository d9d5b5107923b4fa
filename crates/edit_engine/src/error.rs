//! Error types for editing operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Failed to load font '{family}': {reason}")]
    FontLoad { family: String, reason: String },

    #[error("Invalid generated layout: {0}")]
    InvalidResponse(String),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("Undo stack is empty")]
    UndoStackEmpty,

    #[error("Redo stack is empty")]
    RedoStackEmpty,
}

impl EditError {
    /// Errors that the session swallows as no-ops: the command referred to
    /// something that does not exist or was refused
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound(_) | Self::PageNotFound(_) | Self::InvalidCommand(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
