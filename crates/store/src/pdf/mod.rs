//! PDF Export Module
//!
//! Turns a design into a PDF file with one of two interchangeable
//! backends that share the object model, writer and resources.
//!
//! # Architecture
//!
//! - `objects`: PDF object model (Dictionary, Array, Stream, Reference)
//! - `content`: Content stream generation (text, paths, images)
//! - `document`: Page output, shared resources and the info dictionary
//! - `fonts`: Standard Type 1 font resources
//! - `images`: Data URL decoding, image XObjects and placeholders
//! - `renderer`: Page and element traversal shared by the backends
//! - `canvas_backend`: Millimeter canvas primitives with per-call rotation
//! - `stream_backend`: Point-space operators with graphics-state rotation
//! - `writer`: Object numbering, xref table and file assembly
//! - `options`: PDF export configuration
//! - `api`: Public API for PDF export

mod api;
pub mod canvas_backend;
mod content;
mod document;
mod fonts;
mod images;
mod objects;
mod options;
mod renderer;
pub mod stream_backend;
mod writer;

pub use api::*;
pub use options::*;
pub use renderer::{PageGeometry, PageRenderer, RenderStats};

// Re-export error type
pub use writer::PdfError;

#[cfg(test)]
mod tests;
