//! PDF Export Public API
//!
//! Entry points that take a design and produce a PDF, in memory, on disk
//! or on a blocking worker. The backend is picked from the options.

use super::canvas_backend::CanvasBackend;
use super::options::{PdfBackend, PdfExportOptions};
use super::renderer::{render_document, PageRenderer, RenderStats};
use super::stream_backend::StreamBackend;
use super::writer::{write_document, PdfError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use doc_model::DesignState;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::{debug, info};

/// A finished export
#[derive(Debug, Clone)]
pub struct PdfExport {
    pub bytes: Vec<u8>,
    pub stats: RenderStats,
}

fn renderer_for(backend: PdfBackend) -> Box<dyn PageRenderer> {
    match backend {
        PdfBackend::Canvas => Box::new(CanvasBackend::new()),
        PdfBackend::Stream => Box::new(StreamBackend::new()),
    }
}

/// Render a design to PDF bytes, with what was drawn
///
/// # Example
///
/// ```ignore
/// use store::pdf::{render_pdf, PdfBackend, PdfExportOptions};
///
/// let options = PdfExportOptions::new()
///     .with_title("Poster")
///     .with_backend(PdfBackend::Stream);
/// let export = render_pdf(&state, &options)?;
/// println!("{} pages", export.stats.pages);
/// ```
pub fn render_pdf(state: &DesignState, options: &PdfExportOptions) -> Result<PdfExport> {
    validate_document(state)?;
    if !(0..state.pages.len()).any(|i| options.should_include_page(i)) {
        return Err(PdfError::InvalidDocument(
            "Page range selects no pages".to_string(),
        ));
    }
    debug!(backend = %options.backend, pages = state.pages.len(), "Starting PDF export");

    let mut renderer = renderer_for(options.backend);
    let (pages, resources, stats) = render_document(state, options, renderer.as_mut());
    let bytes = write_document(pages, &resources, options, Vec::new())?;

    info!(
        backend = %options.backend,
        pages = stats.pages,
        drawn = stats.elements_drawn,
        failed = stats.elements_failed,
        bytes = bytes.len(),
        "PDF export complete"
    );
    Ok(PdfExport { bytes, stats })
}

/// Export a design to PDF bytes in memory
pub fn export_pdf_bytes(state: &DesignState, options: &PdfExportOptions) -> Result<Vec<u8>> {
    render_pdf(state, options).map(|export| export.bytes)
}

/// Export a design to a PDF file
pub fn export_pdf(
    state: &DesignState,
    path: impl AsRef<Path>,
    options: &PdfExportOptions,
) -> Result<RenderStats> {
    validate_document(state)?;
    let mut renderer = renderer_for(options.backend);
    let (pages, resources, stats) = render_document(state, options, renderer.as_mut());

    let file = File::create(path.as_ref())?;
    write_document(pages, &resources, options, BufWriter::new(file))?;
    info!(path = %path.as_ref().display(), pages = stats.pages, "PDF written");
    Ok(stats)
}

/// Export on a blocking worker so an async caller's executor keeps running
pub async fn export_pdf_async(state: DesignState, options: PdfExportOptions) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || export_pdf_bytes(&state, &options))
        .await
        .map_err(|e| PdfError::Io(io::Error::other(e)))?
}

/// The export as a `data:application/pdf;base64,` URL, for previews
pub fn pdf_preview_data_url(state: &DesignState, options: &PdfExportOptions) -> Result<String> {
    let bytes = export_pdf_bytes(state, options)?;
    Ok(format!("data:application/pdf;base64,{}", STANDARD.encode(bytes)))
}

/// Default PDF export options
pub fn default_options() -> PdfExportOptions {
    PdfExportOptions::default()
}

/// Check that a design has pages with a usable size
pub fn validate_document(state: &DesignState) -> Result<()> {
    if state.pages.is_empty() {
        return Err(PdfError::InvalidDocument("No pages to export".to_string()));
    }

    for (i, page) in state.pages.iter().enumerate() {
        let (width, height) = page.settings.size_mm();
        if !(width.is_finite() && width > 0.0) {
            return Err(PdfError::InvalidDocument(format!(
                "Page {} has invalid width: {}",
                i, width
            )));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(PdfError::InvalidDocument(format!(
                "Page {} has invalid height: {}",
                i, height
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Element, ElementType};
    use tempfile::TempDir;

    fn design() -> DesignState {
        let mut state = DesignState::default();
        state.pages[0]
            .elements
            .push(Element::new(ElementType::Text, 10.0, 10.0, 80.0, 20.0).with_content("Hello"));
        state
    }

    #[test]
    fn test_export_bytes_both_backends() {
        for backend in [PdfBackend::Canvas, PdfBackend::Stream] {
            let options = PdfExportOptions::new().with_backend(backend);
            let bytes = export_pdf_bytes(&design(), &options).unwrap();
            assert!(bytes.starts_with(b"%PDF-1.4"));
            assert!(bytes.ends_with(b"%%EOF\n"));
        }
    }

    #[test]
    fn test_empty_page_range_is_rejected() {
        let options = PdfExportOptions::new().with_page_range(super::super::PageRange::single(3));
        assert!(matches!(
            export_pdf_bytes(&design(), &options),
            Err(PdfError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_export_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.pdf");
        let stats = export_pdf(&design(), &path, &PdfExportOptions::default()).unwrap();
        assert_eq!(stats.pages, 1);
        assert_eq!(stats.elements_drawn, 1);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.pdf");
        let result = export_pdf(&design(), &path, &PdfExportOptions::default());
        assert!(matches!(result, Err(PdfError::Io(_))));
    }

    #[tokio::test]
    async fn test_export_async() {
        let bytes = export_pdf_async(design(), PdfExportOptions::default()).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_preview_data_url() {
        let url = pdf_preview_data_url(&design(), &default_options()).unwrap();
        let payload = url.strip_prefix("data:application/pdf;base64,").unwrap();
        assert!(STANDARD.decode(payload).unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn test_validate_document() {
        let mut state = design();
        assert!(validate_document(&state).is_ok());

        state.pages[0].settings.width = 0.0;
        assert!(matches!(validate_document(&state), Err(PdfError::InvalidDocument(_))));

        state.pages.clear();
        assert!(export_pdf_bytes(&state, &default_options()).is_err());
    }
}
