//! Error types for storage and export operations

use crate::pdf::PdfError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("PDF export failed: {0}")]
    Pdf(#[from] PdfError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
