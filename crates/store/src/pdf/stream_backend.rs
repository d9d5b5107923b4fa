//! Content-stream backend
//!
//! Works directly in PDF points with y up. Every element is drawn inside
//! its own graphics state, rotated about its center, so there are no
//! special cases per primitive.

use super::content::ContentStream;
use super::document::Resources;
use super::images::{decode_data_url, draw_placeholder, EmbeddedImage, ImageKind, ImageSource, Placeholder};
use super::renderer::{PageGeometry, PageRenderer};
use super::writer::Result;
use doc_model::units::mm_to_pt;
use doc_model::{Color, Element, ElementType, PageSettings, TextAlign};
use text_engine::{wrap_words_greedy, FontSpec, StandardFace, StandardMetrics};
use tracing::warn;

/// Lines are packed against this fraction of the box width
const WRAP_MARGIN: f64 = 1.7;
const LINE_SPACING: f64 = 1.2;
const FALLBACK_FONT_SIZE: f64 = 16.0;
const UNDERLINE_THICKNESS: f64 = 0.5;

/// Element box in points, bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
struct PdfBox {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl PdfBox {
    fn of(el: &Element, page: &PageGeometry) -> Self {
        let height = mm_to_pt(el.height);
        Self {
            x: mm_to_pt(el.x),
            y: page.height_pt - mm_to_pt(el.y) - height,
            width: mm_to_pt(el.width),
            height,
        }
    }

    fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Whole point font size taken from the CSS pixel size
fn font_size(el: &Element) -> f64 {
    let size = el.styles.font_size_px().trunc();
    if size > 0.0 {
        size
    } else {
        FALLBACK_FONT_SIZE
    }
}

fn font_spec(el: &Element) -> FontSpec {
    FontSpec {
        family: el.styles.font_family.clone(),
        bold: el.styles.is_bold(),
        italic: el.styles.is_italic(),
        ..FontSpec::new(font_size(el))
    }
}

/// Wrapped lines of a text element, as this backend breaks them
pub fn wrap_lines(element: &Element) -> Vec<String> {
    let content = element.text();
    if content.trim().is_empty() {
        return Vec::new();
    }
    let max_width = mm_to_pt(element.width) / WRAP_MARGIN;
    wrap_words_greedy(content, max_width, &font_spec(element), &StandardMetrics)
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect()
}

/// Emitter writing explicit graphics-state operators
#[derive(Debug, Default)]
pub struct StreamBackend;

impl StreamBackend {
    pub fn new() -> Self {
        Self
    }

    fn draw_text(&self, el: &Element, b: PdfBox, out: &mut ContentStream, resources: &mut Resources) {
        let lines = wrap_lines(el);
        if lines.is_empty() {
            return;
        }
        let size = font_size(el);
        let face = StandardFace::from_styles(&el.styles);
        let font = resources.font(face);
        let color = el.styles.color.unwrap_or(Color::BLACK);

        let line_height = size * LINE_SPACING;
        let total = lines.len() as f64 * line_height;
        let top = b.y + b.height - (b.height - total) / 2.0;

        out.set_fill_color(color);
        for (i, line) in lines.iter().enumerate() {
            let width = face.text_width(line, size);
            let x = match el.styles.text_align {
                Some(TextAlign::Center) => b.x + (b.width - width) / 2.0,
                Some(TextAlign::Right) => b.x + b.width - width,
                _ => b.x,
            };
            let y = top - (i + 1) as f64 * line_height;
            out.text_line(&font, size, x, y, 0.0, line);

            if el.styles.is_underlined() {
                let underline = y - size * 0.1;
                out.set_stroke_color(color)
                    .set_line_width(UNDERLINE_THICKNESS)
                    .line(x, underline, x + width, underline);
            }
        }
    }

    fn draw_shape(&self, el: &Element, b: PdfBox, out: &mut ContentStream) {
        let fill = el.styles.background_color.unwrap_or(Color::WHITE);
        if fill.is_transparent() {
            return;
        }
        out.set_fill_color(fill);
        if el.styles.is_round() {
            let r = b.width / 2.0;
            out.ellipse(b.x + r, b.y + r, r, r);
        } else {
            out.rect(b.x, b.y, b.width, b.height);
        }
        out.fill();
    }

    fn draw_line(&self, el: &Element, b: PdfBox, out: &mut ContentStream) {
        let color = el
            .styles
            .background_color
            .filter(|c| !c.is_transparent())
            .unwrap_or(Color::BLACK);
        let y = b.y + b.height / 2.0;
        out.set_stroke_color(color)
            .set_line_width(b.height)
            .line(b.x, y, b.x + b.width, y);
    }

    fn draw_image(&self, el: &Element, b: PdfBox, out: &mut ContentStream, resources: &mut Resources) {
        let placeholder = match ImageSource::of(el) {
            ImageSource::Missing => Placeholder::Empty,
            ImageSource::External(_) => Placeholder::External,
            ImageSource::DataUrl(url) => {
                let kind = if url.contains("data:image/png") {
                    ImageKind::Png
                } else {
                    ImageKind::Jpeg
                };
                match decode_data_url(url).and_then(|bytes| EmbeddedImage::decode(&bytes, kind)) {
                    Ok(image) => {
                        let name = resources.image(image);
                        out.draw_image(&name, b.x, b.y, b.width, b.height);
                        return;
                    }
                    Err(e) => {
                        warn!(element = %el.id, error = %e, "Image could not be embedded, drawing placeholder");
                        Placeholder::Error
                    }
                }
            }
        };
        draw_placeholder(out, resources, placeholder, b.x, b.y, b.width, b.height);
    }
}

impl PageRenderer for StreamBackend {
    fn begin_page(
        &mut self,
        settings: &PageSettings,
        page: &PageGeometry,
        out: &mut ContentStream,
        _resources: &mut Resources,
    ) {
        let bg = Some(settings.background_color)
            .filter(|c| !c.is_transparent())
            .unwrap_or(Color::WHITE);
        out.set_fill_color(bg).rect(0.0, 0.0, page.width_pt, page.height_pt).fill();
    }

    fn draw_element(
        &mut self,
        element: &Element,
        page: &PageGeometry,
        out: &mut ContentStream,
        resources: &mut Resources,
    ) -> Result<()> {
        let b = PdfBox::of(element, page);
        let (cx, cy) = b.center();
        out.save_state().rotate_about(cx, cy, -element.rotation_radians());
        match element.element_type {
            ElementType::Text => self.draw_text(element, b, out, resources),
            ElementType::Shape => self.draw_shape(element, b, out),
            ElementType::Line => self.draw_line(element, b, out),
            ElementType::Image => self.draw_image(element, b, out, resources),
        }
        out.restore_state();
        Ok(())
    }
}
