//! Font selection
//!
//! Element styles name fonts with free-form CSS family lists. For measuring
//! and for PDF output every family is mapped onto one of the three standard
//! PDF families by keyword, with bold and italic picking the variant.

use crate::metrics::{face_metrics, FaceMetrics};
use doc_model::Styles;
use serde::{Deserialize, Serialize};

/// Standard PDF font families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardFamily {
    Helvetica,
    Times,
    Courier,
}

impl StandardFamily {
    /// Map a CSS font-family list by keyword.
    ///
    /// Sans-serif names (including "Arial") map to Helvetica, "serif" or
    /// "times" to Times, "mono" or "courier" to Courier, anything else to
    /// Helvetica.
    pub fn from_css(family: &str) -> Self {
        let f = family.to_ascii_lowercase();
        if f.contains("arial") || f.contains("sans-serif") || f.contains("helvetica") {
            Self::Helvetica
        } else if f.contains("serif") || f.contains("times") {
            Self::Times
        } else if f.contains("mono") || f.contains("courier") {
            Self::Courier
        } else {
            Self::Helvetica
        }
    }
}

/// One concrete standard face: family plus weight and slant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StandardFace {
    pub family: StandardFamily,
    pub bold: bool,
    pub italic: bool,
}

impl StandardFace {
    pub const HELVETICA: StandardFace = StandardFace {
        family: StandardFamily::Helvetica,
        bold: false,
        italic: false,
    };

    pub fn new(family: StandardFamily, bold: bool, italic: bool) -> Self {
        Self { family, bold, italic }
    }

    /// Face for an element's styles
    pub fn from_styles(styles: &Styles) -> Self {
        let family = styles
            .font_family
            .as_deref()
            .map(StandardFamily::from_css)
            .unwrap_or(StandardFamily::Helvetica);
        Self::new(family, styles.is_bold(), styles.is_italic())
    }

    /// PostScript base font name used in PDF font dictionaries
    pub fn base_font_name(&self) -> &'static str {
        match (self.family, self.bold, self.italic) {
            (StandardFamily::Helvetica, false, false) => "Helvetica",
            (StandardFamily::Helvetica, true, false) => "Helvetica-Bold",
            (StandardFamily::Helvetica, false, true) => "Helvetica-Oblique",
            (StandardFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
            (StandardFamily::Times, false, false) => "Times-Roman",
            (StandardFamily::Times, true, false) => "Times-Bold",
            (StandardFamily::Times, false, true) => "Times-Italic",
            (StandardFamily::Times, true, true) => "Times-BoldItalic",
            (StandardFamily::Courier, false, false) => "Courier",
            (StandardFamily::Courier, true, false) => "Courier-Bold",
            (StandardFamily::Courier, false, true) => "Courier-Oblique",
            (StandardFamily::Courier, true, true) => "Courier-BoldOblique",
        }
    }

    pub fn metrics(&self) -> FaceMetrics {
        face_metrics(self.family, self.bold, self.italic)
    }

    /// Width of `text` at `size`, in the unit of `size`
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        self.metrics().string_width(text, size)
    }
}

impl Default for StandardFace {
    fn default() -> Self {
        Self::HELVETICA
    }
}

/// Everything a measurer needs to know about the font of a text run
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// CSS family list, if any
    pub family: Option<String>,
    /// Font size; widths come back in the same unit
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    /// Extra advance after each character, in the unit of `size`
    pub letter_spacing: f64,
    /// Line height as a multiple of `size`; `None` means `normal`
    pub line_height: Option<f64>,
}

impl FontSpec {
    pub fn new(size: f64) -> Self {
        Self {
            family: None,
            size,
            bold: false,
            italic: false,
            letter_spacing: 0.0,
            line_height: None,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Font spec for an element's styles, in reference pixels
    pub fn from_styles(styles: &Styles) -> Self {
        let size = styles.font_size_px();
        Self {
            family: styles.font_family.clone(),
            size,
            bold: styles.is_bold(),
            italic: styles.is_italic(),
            letter_spacing: styles.letter_spacing_px(),
            line_height: styles.line_height.and_then(|lh| lh.multiplier(size)),
        }
    }

    /// Same font at a different size, with spacing scaled along
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size * factor,
            letter_spacing: self.letter_spacing * factor,
            ..self.clone()
        }
    }

    pub fn standard_face(&self) -> StandardFace {
        let family = self
            .family
            .as_deref()
            .map(StandardFamily::from_css)
            .unwrap_or(StandardFamily::Helvetica);
        StandardFace::new(family, self.bold, self.italic)
    }
}
