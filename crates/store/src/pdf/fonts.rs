//! PDF Font Handling
//!
//! Text is set in the standard Type 1 fonts every viewer carries, so
//! nothing is embedded. Each face used in a document gets one font
//! resource, named `F1`, `F2` and so on in order of first use.

use super::objects::{PdfDictionary, PdfObject};
use text_engine::StandardFace;

/// Standard faces used by a document
#[derive(Debug, Default)]
pub struct FontRegistry {
    faces: Vec<StandardFace>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name of `face`, registering it on first use
    pub fn name_for(&mut self, face: StandardFace) -> String {
        let index = match self.faces.iter().position(|f| *f == face) {
            Some(i) => i,
            None => {
                self.faces.push(face);
                self.faces.len() - 1
            }
        };
        resource_name(index)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// `(resource name, face)` in registration order
    pub fn iter(&self) -> impl Iterator<Item = (String, StandardFace)> + '_ {
        self.faces.iter().enumerate().map(|(i, f)| (resource_name(i), *f))
    }
}

fn resource_name(index: usize) -> String {
    format!("F{}", index + 1)
}

/// Font dictionary of a standard face
pub fn standard_font_dict(face: StandardFace) -> PdfDictionary {
    PdfDictionary::new()
        .with_type("Font")
        .with("Subtype", PdfObject::name("Type1"))
        .with("BaseFont", PdfObject::name(face.base_font_name()))
        .with("Encoding", PdfObject::name("WinAnsiEncoding"))
}
