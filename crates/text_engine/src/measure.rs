//! Text measurement

use crate::{FontSpec, ShapedFont};
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Measures text for wrapping and autosizing.
///
/// Widths are returned in the unit of `FontSpec::size`.
pub trait TextMeasurer {
    /// Advance width of `text`, including letter spacing
    fn text_width(&self, text: &str, font: &FontSpec) -> f64;

    /// `line-height: normal` as a multiple of the font size
    fn normal_line_height(&self, font: &FontSpec) -> f64;

    /// Height of one line box, in the unit of `FontSpec::size`
    fn line_height(&self, font: &FontSpec) -> f64 {
        let multiplier = font
            .line_height
            .unwrap_or_else(|| self.normal_line_height(font));
        multiplier * font.size
    }
}

/// Measures with the standard PDF font metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetrics;

impl TextMeasurer for StandardMetrics {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        let face = font.standard_face();
        let base = face.text_width(text, font.size);
        if font.letter_spacing == 0.0 {
            base
        } else {
            base + font.letter_spacing * text.graphemes(true).count() as f64
        }
    }

    fn normal_line_height(&self, font: &FontSpec) -> f64 {
        font.standard_face().metrics().normal_line_height
    }
}

/// Custom fonts by family name, falling back to standard metrics
#[derive(Debug, Clone, Default)]
pub struct FontLibrary {
    fonts: HashMap<String, ShapedFont>,
    fallback: StandardMetrics,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font under a family name
    pub fn insert(&mut self, family: &str, font: ShapedFont) {
        self.fonts.insert(normalize_family(family), font);
    }

    pub fn remove(&mut self, family: &str) -> Option<ShapedFont> {
        self.fonts.remove(&normalize_family(family))
    }

    pub fn contains(&self, family: &str) -> bool {
        self.fonts.contains_key(&normalize_family(family))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// First family in the CSS list that has a registered font
    fn resolve(&self, font: &FontSpec) -> Option<&ShapedFont> {
        let families = font.family.as_deref()?;
        families
            .split(',')
            .find_map(|name| self.fonts.get(&normalize_family(name)))
    }
}

impl TextMeasurer for FontLibrary {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        match self.resolve(font) {
            Some(shaped) => {
                let spacing = font.letter_spacing * text.graphemes(true).count() as f64;
                shaped.advance(text, font.size) + spacing
            }
            None => self.fallback.text_width(text, font),
        }
    }

    fn normal_line_height(&self, font: &FontSpec) -> f64 {
        match self.resolve(font) {
            Some(shaped) => shaped.normal_line_height(),
            None => self.fallback.normal_line_height(font),
        }
    }
}

fn normalize_family(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_width_with_letter_spacing() {
        let plain = FontSpec::new(10.0);
        let spaced = FontSpec { letter_spacing: 1.0, ..FontSpec::new(10.0) };
        let m = StandardMetrics;
        assert!((m.text_width("abc", &spaced) - m.text_width("abc", &plain) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_height() {
        let m = StandardMetrics;
        let normal = FontSpec::new(20.0);
        assert!((m.line_height(&normal) - 23.0).abs() < 1e-9);

        let explicit = FontSpec { line_height: Some(1.5), ..FontSpec::new(20.0) };
        assert_eq!(m.line_height(&explicit), 30.0);
    }

    #[test]
    fn test_library_falls_back_to_standard() {
        let lib = FontLibrary::new();
        let spec = FontSpec::new(12.0).with_family("'My Font', Arial");
        assert_eq!(lib.text_width("Hello", &spec), StandardMetrics.text_width("Hello", &spec));
        assert!(lib.is_empty());
    }

    #[test]
    fn test_family_normalization() {
        assert_eq!(normalize_family(" \"Fira Sans\" "), "fira sans");
    }
}
