//! Document to PDF pages
//!
//! Both backends share the traversal: pages in order, elements in paint
//! order, hidden elements skipped. Each element is drawn into its own
//! scratch stream that only joins the page when drawing succeeds, so a
//! failing element never leaves half an operator sequence behind.

use super::content::ContentStream;
use super::document::{PageOutput, Resources};
use super::options::PdfExportOptions;
use super::writer::{PdfError, Result};
use doc_model::units::mm_to_pt;
use doc_model::{DesignState, Element, PageSettings};
use tracing::{debug, warn};

/// Page size in both units the backends work in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub width_pt: f64,
    pub height_pt: f64,
}

impl PageGeometry {
    pub fn of(settings: &PageSettings) -> Self {
        let (width_mm, height_mm) = settings.size_mm();
        Self {
            width_mm,
            height_mm,
            width_pt: mm_to_pt(width_mm),
            height_pt: mm_to_pt(height_mm),
        }
    }
}

/// One PDF emission strategy
pub trait PageRenderer {
    /// Draw whatever goes under the elements of a page
    fn begin_page(
        &mut self,
        settings: &PageSettings,
        page: &PageGeometry,
        out: &mut ContentStream,
        resources: &mut Resources,
    );

    fn draw_element(
        &mut self,
        element: &Element,
        page: &PageGeometry,
        out: &mut ContentStream,
        resources: &mut Resources,
    ) -> Result<()>;
}

/// What an export produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub pages: usize,
    pub elements_drawn: usize,
    pub elements_hidden: usize,
    pub elements_failed: usize,
    /// Text strings shown, placeholder labels included
    pub text_runs: usize,
}

/// Render every selected page of `state`
pub fn render_document(
    state: &DesignState,
    options: &PdfExportOptions,
    renderer: &mut dyn PageRenderer,
) -> (Vec<PageOutput>, Resources, RenderStats) {
    let mut resources = Resources::new();
    let mut stats = RenderStats::default();
    let mut pages = Vec::new();

    for (index, page) in state.pages.iter().enumerate() {
        if !options.should_include_page(index) {
            continue;
        }
        let geometry = PageGeometry::of(&page.settings);
        let mut output = PageOutput::new(geometry.width_pt, geometry.height_pt);
        renderer.begin_page(&page.settings, &geometry, &mut output.content, &mut resources);

        for element in page.paint_order() {
            if element.styles.is_hidden() {
                stats.elements_hidden += 1;
                continue;
            }
            let mut scratch = ContentStream::new();
            match check_geometry(element)
                .and_then(|_| renderer.draw_element(element, &geometry, &mut scratch, &mut resources))
            {
                Ok(()) => {
                    output.content.append(scratch);
                    stats.elements_drawn += 1;
                }
                Err(e) => {
                    warn!(element = %element.id, error = %e, "Skipping element that failed to render");
                    stats.elements_failed += 1;
                }
            }
        }

        stats.text_runs += output.content.text_runs();
        debug!(page = %page.id, elements = page.elements.len(), "Rendered page");
        pages.push(output);
    }
    stats.pages = pages.len();
    (pages, resources, stats)
}

fn check_geometry(element: &Element) -> Result<()> {
    let values = [element.x, element.y, element.width, element.height, element.rotation];
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PdfError::InvalidDocument(format!(
            "element {} has non-finite geometry",
            element.id
        )))
    }
}

/// Rotate `(x, y)` about `(cx, cy)` by `degrees`, clockwise on a y-down page
pub fn rotate_point(x: f64, y: f64, cx: f64, cy: f64, degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (dx, dy) = (x - cx, y - cy);
    (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
}
