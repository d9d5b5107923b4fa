//! Canvas-style backend
//!
//! Works in page millimeters with the origin at the top-left, the way a
//! drawing canvas does, and converts to PDF points only when an operator
//! is written. Text and images are rotated per call; rectangle fills are
//! not, except for the quarter-turn shift below.

use super::content::ContentStream;
use super::document::Resources;
use super::images::{
    contain_rect, decode_data_url, draw_placeholder, EmbeddedImage, ImageKind, ImageSource,
    Placeholder,
};
use super::renderer::{rotate_point, PageGeometry, PageRenderer};
use super::writer::Result;
use doc_model::units::{mm_to_pt, pt_to_mm};
use doc_model::{AlignItems, Color, Element, ElementType, ObjectFit, PageSettings, TextAlign};
use text_engine::{split_text_to_size, FontSpec, StandardFace, StandardMetrics, TextMeasurer};
use tracing::warn;

/// Inset of text from the sides of its box, in mm
const TEXT_PADDING: f64 = 2.0;
/// Line height multiplier when the element declares none
const DEFAULT_LINE_HEIGHT: f64 = 1.4;
/// Distance of an underline below the baseline, in mm
const UNDERLINE_OFFSET: f64 = 1.0;
const UNDERLINE_WIDTH: f64 = 0.2;
/// Thinnest stroke a line element is drawn with, in mm
const MIN_LINE_WIDTH: f64 = 0.1;

/// Maps top-left millimeters onto PDF user space
#[derive(Debug, Clone, Copy)]
struct Frame {
    page_height: f64,
}

impl Frame {
    fn new(page: &PageGeometry) -> Self {
        Self { page_height: page.height_pt }
    }

    fn x(&self, mm: f64) -> f64 {
        mm_to_pt(mm)
    }

    fn y(&self, mm: f64) -> f64 {
        self.page_height - mm_to_pt(mm)
    }

    /// `(x, y, width, height)` of a top-left mm box, bottom-left in points
    fn rect(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64, f64, f64) {
        (self.x(x), self.y(y + height), mm_to_pt(width), mm_to_pt(height))
    }
}

/// One wrapped line placed on the page, in mm, before rotation
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Left end of the baseline
    pub x: f64,
    pub baseline: f64,
    pub width: f64,
}

/// Wrapped and positioned text of one element
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub face: StandardFace,
    pub font_size: f64,
    pub lines: Vec<PlacedLine>,
}

/// Lay out a text element the way this backend draws it.
///
/// The CSS pixel font size is used as the point size. The line stack is
/// three quarters of it, read as millimeters, and the first baseline sits
/// one stack below the top padding unless a flex container centers or
/// bottom-aligns the block. Whitespace-only text has no layout.
pub fn layout_text(element: &Element) -> Option<TextLayout> {
    let content = element.text();
    if content.trim().is_empty() {
        return None;
    }
    let styles = &element.styles;
    let face = StandardFace::from_styles(styles);
    let font_size = styles.font_size_px();
    let stack = font_size * 0.75;
    let multiplier = styles
        .line_height
        .and_then(|lh| lh.multiplier(font_size))
        .filter(|m| m.is_finite() && *m > 0.0)
        .unwrap_or(DEFAULT_LINE_HEIGHT);
    let advance = stack * multiplier;

    let font = FontSpec {
        size: pt_to_mm(font_size),
        letter_spacing: 0.0,
        ..FontSpec::from_styles(styles)
    };
    let measurer = StandardMetrics;
    let wrapped = split_text_to_size(content, element.width - 2.0 * TEXT_PADDING, &font, &measurer);
    let total = wrapped.len() as f64 * advance;

    let start = match (styles.is_flex(), &styles.align_items) {
        (true, Some(AlignItems::Center)) => (element.height - total) / 2.0 + stack,
        (true, Some(AlignItems::FlexEnd)) => element.height - total + stack - TEXT_PADDING,
        _ => TEXT_PADDING + stack,
    };

    let lines = wrapped
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let width = measurer.text_width(&text, &font);
            let x = match styles.text_align {
                Some(TextAlign::Center) => element.x + element.width / 2.0 - width / 2.0,
                Some(TextAlign::Right) => element.x + element.width - TEXT_PADDING - width,
                _ => element.x + TEXT_PADDING,
            };
            let baseline = element.y + start + i as f64 * advance;
            PlacedLine { text, x, baseline, width }
        })
        .collect();

    Some(TextLayout { face, font_size, lines })
}

/// Wrapped lines of a text element, as this backend breaks them
pub fn wrap_lines(element: &Element) -> Vec<String> {
    layout_text(element)
        .map(|layout| layout.lines.into_iter().map(|l| l.text).collect())
        .unwrap_or_default()
}

/// Emitter with canvas drawing primitives
#[derive(Debug, Default)]
pub struct CanvasBackend;

impl CanvasBackend {
    pub fn new() -> Self {
        Self
    }

    fn draw_text(&self, el: &Element, frame: Frame, out: &mut ContentStream, resources: &mut Resources) {
        let styles = &el.styles;
        if let Some(bg) = styles.background_color.filter(|c| !c.is_transparent()) {
            let (x, y, w, h) = frame.rect(el.x, el.y, el.width, el.height);
            out.set_fill_color(bg).rect(x, y, w, h).fill();
        }
        let Some(layout) = layout_text(el) else {
            return;
        };

        let color = styles.color.unwrap_or(Color::BLACK);
        let font = resources.font(layout.face);
        let (cx, cy) = el.center();
        let turn = |x: f64, y: f64| {
            let (x, y) = rotate_point(x, y, cx, cy, el.rotation);
            (frame.x(x), frame.y(y))
        };

        out.set_fill_color(color);
        for line in &layout.lines {
            let (x, y) = turn(line.x, line.baseline);
            out.text_line(&font, layout.font_size, x, y, -el.rotation_radians(), &line.text);

            if styles.is_underlined() {
                let underline = line.baseline + UNDERLINE_OFFSET;
                let (x1, y1) = turn(line.x, underline);
                let (x2, y2) = turn(line.x + line.width, underline);
                out.set_stroke_color(color)
                    .set_line_width(mm_to_pt(UNDERLINE_WIDTH))
                    .line(x1, y1, x2, y2);
            }
        }
    }

    fn draw_shape(&self, el: &Element, frame: Frame, out: &mut ContentStream, resources: &mut Resources) {
        let styles = &el.styles;
        out.save_state();
        let opacity = styles.opacity();
        if opacity < 1.0 {
            let state = resources.opacity(opacity);
            out.set_graphics_state(&state);
        }

        let radius = styles.border_radius.map(|r| r.value).filter(|r| *r > 0.0).unwrap_or(0.0);
        let round = styles.is_round() || (radius > 0.0 && radius >= el.width.min(el.height) / 2.0);
        let fill = styles.background_color.unwrap_or(Color::BLACK);

        if !fill.is_transparent() {
            out.set_fill_color(fill);
            if round {
                let (cx, cy) = el.center();
                out.ellipse(frame.x(cx), frame.y(cy), mm_to_pt(el.width / 2.0), mm_to_pt(el.height / 2.0));
            } else {
                // Fills are not rotated here; a quarter turn swaps the sides
                // about the top-left corner instead
                let (x, y, w, h) = if el.rotation == 90.0 {
                    frame.rect(el.x + el.height / 2.0, el.y - el.width / 2.0, el.height, el.width)
                } else {
                    frame.rect(el.x, el.y, el.width, el.height)
                };
                out.rounded_rect(x, y, w, h, mm_to_pt(radius));
            }
            out.fill();
        }

        if let Some(width) = styles.border_width_px() {
            let (x, y, w, h) = frame.rect(el.x, el.y, el.width, el.height);
            out.set_stroke_color(styles.border_color().unwrap_or(Color::BLACK))
                .set_line_width(mm_to_pt(width))
                .rounded_rect(x, y, w, h, mm_to_pt(radius))
                .stroke();
        }
        out.restore_state();
    }

    fn draw_line(&self, el: &Element, frame: Frame, out: &mut ContentStream, resources: &mut Resources) {
        let styles = &el.styles;
        let color = styles
            .background_color
            .filter(|c| !c.is_transparent())
            .unwrap_or(Color::BLACK);
        let (sin, cos) = el.rotation_radians().sin_cos();
        let (x2, y2) = (el.x + el.width * cos, el.y + el.width * sin);

        out.save_state();
        let opacity = styles.opacity();
        if opacity < 1.0 {
            let state = resources.opacity(opacity);
            out.set_graphics_state(&state);
        }
        out.set_stroke_color(color)
            .set_line_width(mm_to_pt(el.height.max(MIN_LINE_WIDTH)))
            .line(frame.x(el.x), frame.y(el.y), frame.x(x2), frame.y(y2))
            .restore_state();
    }

    fn draw_image(&self, el: &Element, frame: Frame, out: &mut ContentStream, resources: &mut Resources) {
        let url = match ImageSource::of(el) {
            ImageSource::Missing => return self.placeholder(el, frame, out, resources, Placeholder::Empty),
            ImageSource::External(_) => {
                return self.placeholder(el, frame, out, resources, Placeholder::External)
            }
            ImageSource::DataUrl(url) => url,
        };
        let media_type = url.split(',').next().unwrap_or(url);
        let kind = if media_type.contains("jpeg") || media_type.contains("jpg") {
            ImageKind::Jpeg
        } else {
            ImageKind::Png
        };
        let image = match decode_data_url(url).and_then(|bytes| EmbeddedImage::decode(&bytes, kind)) {
            Ok(image) => image,
            Err(e) => {
                warn!(element = %el.id, error = %e, "Image could not be embedded, drawing placeholder");
                return self.placeholder(el, frame, out, resources, Placeholder::Error);
            }
        };

        let (x, y, w, h) = if el.styles.object_fit == Some(ObjectFit::Contain) {
            contain_rect(el.x, el.y, el.width, el.height, image.aspect_ratio())
        } else {
            (el.x, el.y, el.width, el.height)
        };
        let name = resources.image(image);
        let (cx, cy) = el.center();

        out.save_state();
        let opacity = el.styles.opacity();
        if opacity < 1.0 {
            let state = resources.opacity(opacity);
            out.set_graphics_state(&state);
        }
        if el.rotation != 0.0 {
            out.rotate_about(frame.x(cx), frame.y(cy), -el.rotation_radians());
        }
        let (x, y, w, h) = frame.rect(x, y, w, h);
        out.draw_image(&name, x, y, w, h).restore_state();
    }

    fn placeholder(
        &self,
        el: &Element,
        frame: Frame,
        out: &mut ContentStream,
        resources: &mut Resources,
        placeholder: Placeholder,
    ) {
        let (x, y, w, h) = frame.rect(el.x, el.y, el.width, el.height);
        draw_placeholder(out, resources, placeholder, x, y, w, h);
    }
}

impl PageRenderer for CanvasBackend {
    fn begin_page(
        &mut self,
        settings: &PageSettings,
        page: &PageGeometry,
        out: &mut ContentStream,
        _resources: &mut Resources,
    ) {
        let bg = settings.background_color;
        if !bg.is_white() && !bg.is_transparent() {
            out.set_fill_color(bg).rect(0.0, 0.0, page.width_pt, page.height_pt).fill();
        }
    }

    fn draw_element(
        &mut self,
        element: &Element,
        page: &PageGeometry,
        out: &mut ContentStream,
        resources: &mut Resources,
    ) -> Result<()> {
        let frame = Frame::new(page);
        match element.element_type {
            ElementType::Text => self.draw_text(element, frame, out, resources),
            ElementType::Shape => self.draw_shape(element, frame, out, resources),
            ElementType::Line => self.draw_line(element, frame, out, resources),
            ElementType::Image => self.draw_image(element, frame, out, resources),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::images::tests::png_data_url;
    use doc_model::{CssLength, Display, Styles, TextDecoration};

    fn a4() -> PageGeometry {
        PageGeometry::of(&PageSettings::default())
    }

    fn draw(el: &Element) -> (String, Resources) {
        let mut out = ContentStream::new();
        let mut resources = Resources::new();
        CanvasBackend::new().draw_element(el, &a4(), &mut out, &mut resources).unwrap();
        (String::from_utf8(out.into_bytes()).unwrap(), resources)
    }

    fn text(content: &str, styles: Styles) -> Element {
        Element::new(ElementType::Text, 10.0, 20.0, 60.0, 30.0)
            .with_content(content)
            .with_styles(styles)
    }

    #[test]
    fn test_first_baseline_and_padding() {
        let layout = layout_text(&text("Hi", Styles::default())).unwrap();
        assert_eq!(layout.font_size, 16.0);
        assert_eq!(layout.lines.len(), 1);
        let line = &layout.lines[0];
        assert_eq!(line.x, 12.0);
        // Top padding plus a 12mm stack
        assert!((line.baseline - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_flex_alignment_moves_the_block() {
        let centered = Styles {
            display: Some(Display::Flex),
            align_items: Some(AlignItems::Center),
            ..Default::default()
        };
        let layout = layout_text(&text("Hi", centered)).unwrap();
        // (30 - 16.8) / 2 + 12
        assert!((layout.lines[0].baseline - (20.0 + 18.6)).abs() < 1e-9);

        let bottom = Styles {
            display: Some(Display::Flex),
            align_items: Some(AlignItems::FlexEnd),
            ..Default::default()
        };
        let layout = layout_text(&text("Hi", bottom)).unwrap();
        assert!((layout.lines[0].baseline - (20.0 + 30.0 - 16.8 + 12.0 - 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_alignment_uses_measured_width() {
        let right = Styles { text_align: Some(TextAlign::Right), ..Default::default() };
        let layout = layout_text(&text("Hi", right)).unwrap();
        let line = &layout.lines[0];
        assert!((line.x + line.width - 68.0).abs() < 1e-9);

        let center = Styles { text_align: Some(TextAlign::Center), ..Default::default() };
        let line = layout_text(&text("Hi", center)).unwrap().lines.remove(0);
        assert!((line.x + line.width / 2.0 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_text_wraps_inside_padding() {
        let el = text("the quick brown fox jumps over the lazy dog again and again", Styles::default());
        let lines = wrap_lines(&el);
        assert!(lines.len() > 1);
        let font = FontSpec { size: pt_to_mm(16.0), ..FontSpec::new(0.0) };
        for line in &lines {
            assert!(StandardMetrics.text_width(line, &font) <= 56.0 + 1e-9);
        }
    }

    #[test]
    fn test_blank_text_draws_nothing() {
        assert!(layout_text(&text("  \n ", Styles::default())).is_none());
        let (content, resources) = draw(&text("   ", Styles::default()));
        assert!(content.is_empty());
        assert!(resources.fonts().is_empty());
    }

    #[test]
    fn test_rotated_text_turns_the_matrix() {
        let el = text("Hi", Styles::default()).with_rotation(90.0);
        let (content, _) = draw(&el);
        // -90 degrees: cos 0, sin -1
        assert!(content.contains("0 -1 1 0 "), "{content}");
    }

    #[test]
    fn test_underline_is_stroked() {
        let styles = Styles { text_decoration: Some(TextDecoration::Underline), ..Default::default() };
        let (content, _) = draw(&text("Hi", styles));
        assert!(content.contains("0.5669 w"));
        assert!(content.contains("\nS\n"));
    }

    #[test]
    fn test_shape_fill_default_and_transparent() {
        let plain = Element::new(ElementType::Shape, 0.0, 0.0, 10.0, 10.0);
        let (content, _) = draw(&plain);
        assert!(content.contains("0 0 0 rg"));
        assert!(content.contains(" re\nf\n"));

        let clear = plain.clone().with_styles(Styles {
            background_color: Some(Color::TRANSPARENT),
            ..Default::default()
        });
        let (content, _) = draw(&clear);
        assert!(!content.contains(" re"));
    }

    #[test]
    fn test_round_shape_is_an_ellipse() {
        let styles = Styles { border_radius: Some(CssLength::percent(50.0)), ..Default::default() };
        let el = Element::new(ElementType::Shape, 0.0, 0.0, 40.0, 20.0).with_styles(styles);
        let (content, _) = draw(&el);
        assert_eq!(content.matches(" c\n").count(), 4);
        assert!(!content.contains(" re\n"));
    }

    #[test]
    fn test_quarter_turn_shape_shift() {
        let el = Element::new(ElementType::Shape, 50.0, 50.0, 40.0, 20.0).with_rotation(90.0);
        let (content, _) = draw(&el);
        let frame = Frame::new(&a4());
        let (x, y, w, h) = frame.rect(60.0, 30.0, 20.0, 40.0);
        let expected = format!(
            "{} {} {} {} re",
            crate::pdf::content::fmt_num(x),
            crate::pdf::content::fmt_num(y),
            crate::pdf::content::fmt_num(w),
            crate::pdf::content::fmt_num(h)
        );
        assert!(content.contains(&expected), "{content}");
    }

    #[test]
    fn test_border_and_opacity() {
        let styles = Styles {
            border: Some("2px solid #ff0000".into()),
            opacity: Some(0.5),
            ..Default::default()
        };
        let el = Element::new(ElementType::Shape, 0.0, 0.0, 10.0, 10.0).with_styles(styles);
        let (content, resources) = draw(&el);
        assert!(content.contains("/GS1 gs"));
        assert!(content.contains("1 0 0 RG"));
        assert!(content.contains("\nS\n"));
        assert_eq!(resources.opacities().count(), 1);
    }

    #[test]
    fn test_line_runs_along_rotation() {
        let el = Element::new(ElementType::Line, 0.0, 0.0, 100.0, 0.0).with_rotation(90.0);
        let (content, _) = draw(&el);
        // Thickness floor of 0.1mm
        assert!(content.contains("0.2835 w"));
        let frame = Frame::new(&a4());
        let end = format!("0 {} l", crate::pdf::content::fmt_num(frame.y(100.0)));
        assert!(content.contains(&end), "{content}");
    }

    #[test]
    fn test_image_placeholders() {
        let empty = Element::new(ElementType::Image, 0.0, 0.0, 50.0, 50.0);
        let (content, resources) = draw(&empty);
        assert!(content.contains("(Image) Tj"));
        assert!(resources.images().is_empty());

        let external = empty.clone().with_content("https://example.com/cat.png");
        assert!(draw(&external).0.contains("(External Image) Tj"));

        let broken = empty.clone().with_content("data:image/png;base64,bm90IGFuIGltYWdl");
        assert!(draw(&broken).0.contains("(Image Error) Tj"));
    }

    #[test]
    fn test_image_contain_and_rotation() {
        let styles = Styles {
            background_image: Some(png_data_url(4, 2, false)),
            object_fit: Some(ObjectFit::Contain),
            ..Default::default()
        };
        let el = Element::new(ElementType::Image, 0.0, 0.0, 40.0, 40.0)
            .with_styles(styles)
            .with_rotation(30.0);
        let (content, resources) = draw(&el);
        assert_eq!(resources.images().len(), 1);
        assert!(content.contains("/Im1 Do"));
        // Letterboxed to 40 x 20mm
        let scale = format!(
            "{} 0 0 {} ",
            crate::pdf::content::fmt_num(mm_to_pt(40.0)),
            crate::pdf::content::fmt_num(mm_to_pt(20.0))
        );
        assert!(content.contains(&scale), "{content}");
        assert_eq!(content.matches(" cm\n").count(), 4);
    }

    #[test]
    fn test_page_background_rules() {
        let mut out = ContentStream::new();
        let mut resources = Resources::new();
        let mut backend = CanvasBackend::new();
        let mut settings = PageSettings::default();
        backend.begin_page(&settings, &a4(), &mut out, &mut resources);
        assert!(out.is_empty());

        settings.background_color = Color::rgb(0, 0, 255);
        backend.begin_page(&settings, &a4(), &mut out, &mut resources);
        assert!(String::from_utf8(out.into_bytes()).unwrap().contains("0 0 1 rg"));
    }
}
