//! Interaction - Pointer gestures over the design canvas
//!
//! Translates pointer and keyboard events into document edits: drag-move,
//! rotation-aware resize, rotate-by-handle and inline text editing. Text
//! element heights are derived from their wrapped content and refreshed
//! after every change that can affect them.
//!
//! All pointer positions are screen pixels relative to the page's top-left
//! corner at the document's current zoom.

mod autosize;
mod engine;
mod error;
mod gesture;
mod text_edit;
mod transform;

pub use autosize::*;
pub use engine::*;
pub use error::*;
pub use gesture::*;
pub use text_edit::*;
pub use transform::*;
