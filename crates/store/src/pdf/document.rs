//! PDF Document Structure
//!
//! What the backends hand to the writer: finished pages, the shared
//! resources they reference, and the information dictionary.

use super::content::ContentStream;
use super::fonts::FontRegistry;
use super::images::EmbeddedImage;
use super::objects::{PdfDictionary, PdfObject};
use super::options::PdfExportOptions;
use chrono::{DateTime, Utc};
use text_engine::StandardFace;

/// Version written in the file header
pub const PDF_VERSION: &str = "1.4";

/// Producer written in the information dictionary
pub const PRODUCER: &str = "Layout Studio PDF Export";

/// PDF document information
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    pub fn from_options(options: &PdfExportOptions, now: DateTime<Utc>) -> Self {
        Self {
            title: options.title.clone(),
            author: options.author.clone(),
            subject: options.subject.clone(),
            keywords: options.keywords_string(),
            creator: Some(options.creator.clone()),
            producer: Some(PRODUCER.to_string()),
            creation_date: Some(now),
        }
    }

    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        let entries = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                dict.insert(key, PdfObject::text(value));
            }
        }
        if let Some(date) = self.creation_date {
            let stamp = pdf_date(date);
            dict.insert("CreationDate", PdfObject::text(&stamp));
            dict.insert("ModDate", PdfObject::text(&stamp));
        }
        dict
    }
}

/// `D:YYYYMMDDHHmmSS+00'00'`
pub fn pdf_date(date: DateTime<Utc>) -> String {
    format!("D:{}+00'00'", date.format("%Y%m%d%H%M%S"))
}

/// A rendered page, sized in points
#[derive(Debug)]
pub struct PageOutput {
    pub width: f64,
    pub height: f64,
    pub content: ContentStream,
}

impl PageOutput {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            content: ContentStream::new(),
        }
    }

    pub fn media_box(&self) -> PdfObject {
        PdfObject::reals(&[0.0, 0.0, self.width, self.height])
    }
}

/// Fonts, images and opacity states shared by all pages of one document
#[derive(Debug, Default)]
pub struct Resources {
    fonts: FontRegistry,
    images: Vec<EmbeddedImage>,
    /// Alpha values in thousandths
    opacities: Vec<u32>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name of a standard face, registering it on first use
    pub fn font(&mut self, face: StandardFace) -> String {
        self.fonts.name_for(face)
    }

    /// Resource name of a new image XObject
    pub fn image(&mut self, image: EmbeddedImage) -> String {
        self.images.push(image);
        format!("Im{}", self.images.len())
    }

    /// Resource name of an ExtGState with fill and stroke alpha `alpha`
    pub fn opacity(&mut self, alpha: f64) -> String {
        let key = (alpha.clamp(0.0, 1.0) * 1000.0).round() as u32;
        let index = match self.opacities.iter().position(|a| *a == key) {
            Some(i) => i,
            None => {
                self.opacities.push(key);
                self.opacities.len() - 1
            }
        };
        format!("GS{}", index + 1)
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    pub fn images(&self) -> &[EmbeddedImage] {
        &self.images
    }

    /// `(name, alpha)` of every opacity state
    pub fn opacities(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        self.opacities
            .iter()
            .enumerate()
            .map(|(i, a)| (format!("GS{}", i + 1), *a as f64 / 1000.0))
    }
}

pub fn ext_gstate_dict(alpha: f64) -> PdfDictionary {
    PdfDictionary::new()
        .with_type("ExtGState")
        .with("ca", alpha)
        .with("CA", alpha)
}
