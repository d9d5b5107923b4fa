//! Error types for interaction

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("Edit failed: {0}")]
    Edit(#[from] edit_engine::EditError),

    #[error("Projection failed: {0}")]
    Render(#[from] render_model::RenderError),
}

pub type Result<T> = std::result::Result<T, InteractionError>;
