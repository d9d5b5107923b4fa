//! Error types for render model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Page not found: {0}")]
    PageNotFound(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
