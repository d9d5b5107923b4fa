//! Text Engine - Font metrics, measurement and line wrapping
//!
//! This crate measures text for the interaction engine's autosize pass and
//! for both PDF backends.
//!
//! # Modules
//!
//! - `metrics`: Advance widths of the PDF standard fonts
//! - `font`: Mapping CSS font families onto standard faces
//! - `shaper`: Measuring user supplied fonts using rustybuzz
//! - `measure`: The `TextMeasurer` trait and its implementations
//! - `wrap`: Line wrapping strategies

mod error;
mod font;
mod measure;
pub mod metrics;
mod shaper;
mod wrap;

pub use error::*;
pub use font::*;
pub use measure::*;
pub use metrics::{face_metrics, FaceMetrics};
pub use shaper::*;
pub use wrap::*;
