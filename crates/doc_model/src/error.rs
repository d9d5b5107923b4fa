//! Error types for document model operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid length: {0}")]
    InvalidLength(String),

    #[error("Invalid {kind} value: {value}")]
    InvalidKeyword { kind: &'static str, value: String },

    #[error("Invalid page settings: {0}")]
    InvalidPageSettings(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
