//! Measuring text in user supplied fonts using rustybuzz
//!
//! Custom fonts are validated once when they are registered and then shaped
//! on demand. Shaping gives kerning and ligature aware advances, which is
//! what the browser would use when laying out the same text.

use crate::{Result, TextError};
use std::sync::Arc;

/// Basic facts about a parsed font file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontFileInfo {
    pub units_per_em: u16,
    pub glyph_count: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

/// Parse font data and report its metrics.
///
/// Fails when the data is not a usable TrueType/OpenType face.
pub fn inspect_font(data: &[u8]) -> Result<FontFileInfo> {
    let face = rustybuzz::Face::from_slice(data, 0)
        .ok_or_else(|| TextError::InvalidFontData("not a TrueType/OpenType font".into()))?;
    let units_per_em = face.units_per_em() as i32;
    if units_per_em <= 0 {
        return Err(TextError::InvalidFontData("font has no units per em".into()));
    }
    Ok(FontFileInfo {
        units_per_em: units_per_em as u16,
        glyph_count: face.number_of_glyphs() as u16,
        ascender: face.ascender() as i16,
        descender: face.descender() as i16,
        line_gap: face.line_gap() as i16,
    })
}

/// A validated font file that can shape text
#[derive(Debug, Clone)]
pub struct ShapedFont {
    data: Arc<Vec<u8>>,
    info: FontFileInfo,
}

impl ShapedFont {
    /// Validate and wrap font data
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let info = inspect_font(&data)?;
        Ok(Self {
            data: Arc::new(data),
            info,
        })
    }

    pub fn info(&self) -> FontFileInfo {
        self.info
    }

    /// Advance width of shaped `text` at `size`, in the unit of `size`
    pub fn advance(&self, text: &str, size: f64) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        // Validated in from_bytes, parsing again cannot fail
        let Some(face) = rustybuzz::Face::from_slice(&self.data, 0) else {
            return 0.0;
        };
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        let output = rustybuzz::shape(&face, &[], buffer);
        let total: i64 = output
            .glyph_positions()
            .iter()
            .map(|pos| pos.x_advance as i64)
            .sum();
        total as f64 * size / self.info.units_per_em as f64
    }

    /// `line-height: normal` as a multiple of the font size
    pub fn normal_line_height(&self) -> f64 {
        let info = self.info;
        let extent = info.ascender as f64 - info.descender as f64 + info.line_gap as f64;
        extent / info.units_per_em as f64
    }
}
