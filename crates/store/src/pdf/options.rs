//! PDF Export Options
//!
//! Both backends take the same options.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Which emitter renders the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PdfBackend {
    /// Millimeter drawing API with per-call text angles
    #[default]
    Canvas,
    /// Point-based content streams with explicit graphics-state rotation
    Stream,
}

impl std::str::FromStr for PdfBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canvas" => Ok(Self::Canvas),
            "stream" => Ok(Self::Stream),
            other => Err(format!("unknown PDF backend: {other}")),
        }
    }
}

impl std::fmt::Display for PdfBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Canvas => "canvas",
            Self::Stream => "stream",
        })
    }
}

/// Pages to export, as a half-open range of page indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(page: usize) -> Self {
        Self { start: page, end: page + 1 }
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, page: usize) -> bool {
        self.to_range().contains(&page)
    }
}

/// Options for PDF export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfExportOptions {
    /// Suggested file name of the download
    pub filename: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    pub creator: String,
    /// Write the document information dictionary
    pub include_metadata: bool,
    /// Flate-compress content streams
    pub compress: bool,
    pub backend: PdfBackend,
    /// Pages to export; `None` exports all of them
    pub page_range: Option<PageRange>,
}

impl Default for PdfExportOptions {
    fn default() -> Self {
        Self {
            filename: "design-export.pdf".to_string(),
            title: Some("Design Export".to_string()),
            author: Some("Design Studio".to_string()),
            subject: Some("Generated Design".to_string()),
            keywords: vec!["design".to_string(), "export".to_string()],
            creator: "Design Studio".to_string(),
            include_metadata: true,
            compress: true,
            backend: PdfBackend::Canvas,
            page_range: None,
        }
    }
}

impl PdfExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_backend(mut self, backend: PdfBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_page_range(mut self, range: PageRange) -> Self {
        self.page_range = Some(range);
        self
    }

    pub fn should_include_page(&self, index: usize) -> bool {
        self.page_range.map_or(true, |r| r.contains(index))
    }

    /// Keywords as written to the info dictionary
    pub fn keywords_string(&self) -> Option<String> {
        (!self.keywords.is_empty()).then(|| self.keywords.join(", "))
    }
}
