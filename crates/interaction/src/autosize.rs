//! Content-driven height of text elements
//!
//! A text box is measured the way the canvas lays it out: at its on-screen
//! width for the current zoom, with its padding, `pre-wrap` whitespace and
//! breaks allowed between any two characters. The measured height is
//! converted back to mm.

use doc_model::units::px_to_mm;
use doc_model::{
    CssLength, Element, ElementId, FontStyle, FontWeight, LineHeight, Page, Styles, TextAlign, Zoom,
};
use std::collections::HashMap;
use text_engine::{wrap_break_all, FontSpec, TextMeasurer};

/// Padding of a text box in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const TEXT_PADDING_PX: TextPadding = TextPadding {
    top: 8.0,
    right: 2.0,
    bottom: 2.0,
    left: 8.0,
};

/// Height changes at or below this many mm are ignored
pub const AUTOSIZE_THRESHOLD_MM: f64 = 0.1;

/// Height in pixels of a text box `box_width` pixels wide, padding included
pub fn measure_text_height_px(
    content: &str,
    box_width: f64,
    styles: &Styles,
    measurer: &dyn TextMeasurer,
) -> f64 {
    let font = FontSpec::from_styles(styles);
    let p = TEXT_PADDING_PX;
    let inner_width = (box_width - p.left - p.right).max(0.0);
    let lines = wrap_break_all(content, inner_width, &font, measurer).len();
    lines as f64 * measurer.line_height(&font) + p.top + p.bottom
}

/// Measured height of a text element in mm at `zoom`
pub fn measured_height_mm(element: &Element, width_mm: f64, zoom: Zoom, measurer: &dyn TextMeasurer) -> f64 {
    let width_px = zoom.mm_to_screen(width_mm);
    let height_px = measure_text_height_px(element.text(), width_px, &element.styles, measurer);
    px_to_mm(zoom.unapply(height_px))
}

/// New height for a text element, if it differs enough from the stored one
pub fn autosize_height(element: &Element, zoom: Zoom, measurer: &dyn TextMeasurer) -> Option<f64> {
    if !element.is_text() {
        return None;
    }
    let measured = measured_height_mm(element, element.width, zoom, measurer);
    ((measured - element.height).abs() > AUTOSIZE_THRESHOLD_MM).then_some(measured)
}

/// Everything the measured height of a text element depends on, plus the
/// height it was left at
#[derive(Debug, Clone, PartialEq)]
pub struct TextFingerprint {
    zoom: Zoom,
    width: f64,
    height: f64,
    content: Option<String>,
    font_size: Option<CssLength>,
    font_family: Option<String>,
    font_weight: Option<FontWeight>,
    font_style: Option<FontStyle>,
    line_height: Option<LineHeight>,
    letter_spacing: Option<CssLength>,
    text_align: Option<TextAlign>,
}

impl TextFingerprint {
    pub fn of(element: &Element, zoom: Zoom) -> Self {
        let styles = &element.styles;
        Self {
            zoom,
            width: element.width,
            height: element.height,
            content: element.content.clone(),
            font_size: styles.font_size,
            font_family: styles.font_family.clone(),
            font_weight: styles.font_weight.clone(),
            font_style: styles.font_style.clone(),
            line_height: styles.line_height,
            letter_spacing: styles.letter_spacing,
            text_align: styles.text_align.clone(),
        }
    }
}

/// Incremental autosize pass.
///
/// Remembers the fingerprint of every text element it has settled, so a
/// refresh only measures elements whose width, content, text styles or
/// height changed since, or all of them after a zoom change.
#[derive(Debug, Clone, Default)]
pub struct TextHeights {
    settled: HashMap<ElementId, TextFingerprint>,
}

impl TextHeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every settled element, e.g. after the available fonts changed
    pub fn invalidate(&mut self) {
        self.settled.clear();
    }

    /// Height corrections for the text elements of a page.
    ///
    /// `skip` names the element an active resize is driving; its height is
    /// owned by the gesture until pointer-up, so it is neither measured nor
    /// settled. Returns the corrections and the number of elements measured.
    pub fn updates(
        &mut self,
        page: &Page,
        zoom: Zoom,
        measurer: &dyn TextMeasurer,
        skip: Option<&ElementId>,
    ) -> (Vec<(ElementId, f64)>, usize) {
        let mut updates = Vec::new();
        let mut measured = 0;
        for el in page.elements.iter().filter(|el| el.is_text() && Some(&el.id) != skip) {
            let mut print = TextFingerprint::of(el, zoom);
            if self.settled.get(&el.id) == Some(&print) {
                continue;
            }
            measured += 1;
            if let Some(height) = autosize_height(el, zoom, measurer) {
                print.height = height;
                updates.push((el.id.clone(), height));
            }
            self.settled.insert(el.id.clone(), print);
        }
        self.settled.retain(|id, _| page.contains(id) || Some(id) == skip);
        (updates, measured)
    }
}
