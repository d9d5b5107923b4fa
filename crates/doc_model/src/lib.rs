//! Document Model - Pages, elements, styles and unit conversion
//!
//! This crate holds the data model of the layout editor. All geometry is
//! stored in millimeters; [`units`] converts to screen pixels and PDF
//! points. The model carries no editing behavior beyond keeping its own
//! invariants; mutations live in the `edit_engine` crate.

pub mod units;
mod ids;
mod color;
mod error;
pub mod style;
mod element;
mod page;
mod state;

pub use ids::*;
pub use color::*;
pub use error::*;
pub use style::*;
pub use element::*;
pub use page::*;
pub use state::*;
pub use units::Zoom;
