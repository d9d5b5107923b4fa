//! Store - Workflow persistence, settings and PDF export
//!
//! Designs are saved as workflow records in a JSON file, application
//! settings live next to them, and the `pdf` module renders a design to
//! PDF with either of two backends.

mod error;
mod settings;
mod workflow;
pub mod pdf;

pub use error::*;
pub use settings::*;
pub use workflow::*;
