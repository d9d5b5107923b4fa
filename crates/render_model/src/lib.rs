//! Render Model - Projection of the document onto the screen
//!
//! Everything here is a pure function of the document and the zoom level:
//! mm-space boxes become screen-pixel boxes with a rotate-about-center
//! transform, and the editor chrome (rulers, grid, margin guides, handles)
//! is laid out in the same space.

mod error;
mod geometry;
mod guides;
mod handles;
mod projector;

pub use error::*;
pub use geometry::*;
pub use guides::*;
pub use handles::*;
pub use projector::*;
