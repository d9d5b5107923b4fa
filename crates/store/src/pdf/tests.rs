//! End-to-end tests for PDF export

use super::*;
use crate::pdf::images::tests::png_data_url;
use doc_model::{
    Color, DesignState, Element, ElementType, Orientation, Page, PageUnit, Styles, Visibility,
};

const LONG_TEXT: &str = "The quick brown fox jumps over the lazy dog while the cat \
                         watches from the warm windowsill of the old farmhouse";

fn single_text_design() -> DesignState {
    let mut state = DesignState::default();
    state.pages[0].elements.push(
        Element::new(ElementType::Text, 20.0, 20.0, 60.0, 80.0).with_content(LONG_TEXT),
    );
    state
}

fn uncompressed(backend: PdfBackend) -> PdfExportOptions {
    PdfExportOptions::new()
        .with_compression(false)
        .with_backend(backend)
}

fn export_text(state: &DesignState, options: &PdfExportOptions) -> String {
    let bytes = export_pdf_bytes(state, options).unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn test_wrapped_line_count_matches_each_backend() {
    let state = single_text_design();
    let element = &state.pages[0].elements[0];

    let canvas_lines = canvas_backend::wrap_lines(element);
    let stream_lines = stream_backend::wrap_lines(element);
    assert!(canvas_lines.len() > 1);
    assert!(stream_lines.len() > 1);

    let canvas = export_text(&state, &uncompressed(PdfBackend::Canvas));
    let stream = export_text(&state, &uncompressed(PdfBackend::Stream));

    assert_eq!(count(&canvas, ") Tj\n"), canvas_lines.len());
    assert_eq!(count(&stream, ") Tj\n"), stream_lines.len());
    assert_eq!(count(&canvas, "/Type /Page "), count(&stream, "/Type /Page "));
    assert!(canvas.contains("/Count 1"));
    assert!(stream.contains("/Count 1"));
}

#[test]
fn test_stats_report_text_runs() {
    let state = single_text_design();
    let element = &state.pages[0].elements[0];
    for backend in [PdfBackend::Canvas, PdfBackend::Stream] {
        let export = render_pdf(&state, &uncompressed(backend)).unwrap();
        let expected = match backend {
            PdfBackend::Canvas => canvas_backend::wrap_lines(element).len(),
            PdfBackend::Stream => stream_backend::wrap_lines(element).len(),
        };
        assert_eq!(export.stats.text_runs, expected);
        assert_eq!(export.stats.pages, 1);
    }
}

#[test]
fn test_every_page_keeps_its_own_size() {
    let mut state = single_text_design();
    let mut landscape = Page::new();
    landscape.settings.set_orientation(Orientation::Landscape);
    let mut letter = Page::new();
    letter.settings.unit = PageUnit::In;
    letter.settings.width = 8.5;
    letter.settings.height = 11.0;
    state.pages.push(landscape);
    state.pages.push(letter);

    for backend in [PdfBackend::Canvas, PdfBackend::Stream] {
        let pdf = export_text(&state, &uncompressed(backend));
        assert!(pdf.contains("/Count 3"));
        assert!(pdf.contains("/MediaBox [0 0 595.275591 841.889764]"));
        assert!(pdf.contains("/MediaBox [0 0 841.889764 595.275591]"));
        assert!(pdf.contains("/MediaBox [0 0 612 792]"));
    }
}

#[test]
fn test_page_range_selects_pages() {
    let mut state = single_text_design();
    state.pages.push(Page::new());
    state.pages.push(Page::new());
    let options = uncompressed(PdfBackend::Stream).with_page_range(PageRange::new(1, 3));
    let pdf = export_text(&state, &options);
    assert!(pdf.contains("/Count 2"));
    // The text lives on the first page only
    assert_eq!(count(&pdf, ") Tj\n"), 0);

    let none = uncompressed(PdfBackend::Stream).with_page_range(PageRange::new(5, 6));
    assert!(matches!(export_pdf_bytes(&state, &none), Err(PdfError::InvalidDocument(_))));
}

#[test]
fn test_hidden_elements_are_not_exported() {
    let mut state = DesignState::default();
    let hidden = Styles { visibility: Some(Visibility::Hidden), ..Default::default() };
    state.pages[0].elements.push(
        Element::new(ElementType::Text, 0.0, 0.0, 50.0, 20.0)
            .with_content("Secret")
            .with_styles(hidden),
    );
    for backend in [PdfBackend::Canvas, PdfBackend::Stream] {
        let export = render_pdf(&state, &uncompressed(backend)).unwrap();
        assert_eq!(export.stats.elements_hidden, 1);
        assert!(!String::from_utf8_lossy(&export.bytes).contains("Secret"));
    }
}

#[test]
fn test_paint_order_follows_z_index() {
    let red = Styles { background_color: Some(Color::rgb(255, 0, 0)), ..Default::default() };
    let blue = Styles { background_color: Some(Color::rgb(0, 0, 255)), ..Default::default() };
    let mut top = Element::new(ElementType::Shape, 0.0, 0.0, 10.0, 10.0).with_styles(red);
    top.z_index = 5;
    let mut bottom = Element::new(ElementType::Shape, 0.0, 0.0, 10.0, 10.0).with_styles(blue);
    bottom.z_index = 1;

    let mut state = DesignState::default();
    state.pages[0].elements = vec![top, bottom];
    for backend in [PdfBackend::Canvas, PdfBackend::Stream] {
        let pdf = export_text(&state, &uncompressed(backend));
        let blue_at = pdf.find("0 0 1 rg").unwrap();
        let red_at = pdf.find("1 0 0 rg").unwrap();
        assert!(blue_at < red_at);
    }
}

#[test]
fn test_broken_element_does_not_abort_export() {
    let mut state = single_text_design();
    let mut broken = Element::new(ElementType::Shape, 0.0, 0.0, 10.0, 10.0);
    broken.x = f64::INFINITY;
    state.pages[0].elements.push(broken);
    for backend in [PdfBackend::Canvas, PdfBackend::Stream] {
        let export = render_pdf(&state, &uncompressed(backend)).unwrap();
        assert_eq!(export.stats.elements_failed, 1);
        assert_eq!(export.stats.elements_drawn, 1);
        assert!(!String::from_utf8_lossy(&export.bytes).contains("inf"));
    }
}

#[test]
fn test_images_are_embedded_once_per_element() {
    let styles = Styles { background_image: Some(png_data_url(3, 3, true)), ..Default::default() };
    let mut state = DesignState::default();
    state.pages[0].elements = vec![
        Element::new(ElementType::Image, 10.0, 10.0, 30.0, 30.0).with_styles(styles.clone()),
        Element::new(ElementType::Image, 50.0, 10.0, 30.0, 30.0).with_styles(styles),
        Element::new(ElementType::Image, 90.0, 10.0, 30.0, 30.0).with_content("https://example.com/x.png"),
    ];
    for backend in [PdfBackend::Canvas, PdfBackend::Stream] {
        let pdf = export_text(&state, &uncompressed(backend));
        assert_eq!(count(&pdf, "/Subtype /Image"), 4, "two images and their soft masks");
        assert_eq!(count(&pdf, "/SMask "), 2);
        assert!(pdf.contains("/Im1 Do") && pdf.contains("/Im2 Do"));
        assert!(pdf.contains("(External Image) Tj"));
    }
}

#[test]
fn test_metadata_and_compression() {
    let options = PdfExportOptions::new()
        .with_title("Spring Poster")
        .with_author("Ada")
        .with_keywords(vec!["poster".into(), "spring".into()]);
    let pdf = export_text(&single_text_design(), &options);
    assert!(pdf.contains("/Title (Spring Poster)"));
    assert!(pdf.contains("/Author (Ada)"));
    assert!(pdf.contains("/Keywords (poster, spring)"));
    assert!(pdf.contains("/Filter /FlateDecode"));
    assert!(!pdf.contains(") Tj"));
}
