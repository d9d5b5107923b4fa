//! Edit Engine - Commands, undo/redo history and the editing session
//!
//! Every mutation of a [`doc_model::DesignState`] is a [`Command`] producing a
//! new state. The [`EditSession`] applies commands, records undo steps and
//! owns the fonts loaded for text measurement.

mod ai_import;
mod command;
mod element_commands;
mod error;
mod fonts;
mod history;
mod order_commands;
mod page_commands;
mod session;
mod settings;
mod view_commands;

pub use ai_import::*;
pub use command::*;
pub use element_commands::*;
pub use error::*;
pub use fonts::*;
pub use history::*;
pub use order_commands::*;
pub use page_commands::*;
pub use session::*;
pub use settings::*;
pub use view_commands::*;
