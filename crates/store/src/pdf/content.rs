//! PDF Content Stream Generation
//!
//! A builder for the graphics operators of a page. All coordinates are in
//! PDF user space: points, origin at the bottom-left, y up.
//!
//! # Operators used
//!
//! - q/Q, cm, gs: graphics state, transforms, extended state (opacity)
//! - w, rg/RG: line width and colors
//! - m, l, c, re, h, S, f, B: paths
//! - BT/ET, Tf, Tm, Tj: text
//! - Do: images

use super::objects::{encode_win_ansi, escape_literal, format_real};
use doc_model::Color;
use std::io::Write;

/// Bezier control distance for a quarter circle of radius 1
const KAPPA: f64 = 0.552_284_749_8;

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
    text_runs: usize,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of `Tj` operators written so far
    pub fn text_runs(&self) -> usize {
        self.text_runs
    }

    /// Move everything written to `other` onto the end of this stream
    pub fn append(&mut self, other: ContentStream) {
        self.data.extend(other.data);
        self.text_runs += other.text_runs;
    }

    // =========================================================================
    // Graphics State
    // =========================================================================

    pub fn save_state(&mut self) -> &mut Self {
        self.write_line("q")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.write_line("Q")
    }

    /// Concatenate a matrix to the CTM (cm)
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        let line = format!("{} cm", fmt_all(&[a, b, c, d, e, f]));
        self.write_line(&line)
    }

    pub fn translate(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.transform(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Rotate counterclockwise by `radians`
    pub fn rotate(&mut self, radians: f64) -> &mut Self {
        let (sin, cos) = radians.sin_cos();
        self.transform(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotate about `(cx, cy)` by `radians`, counterclockwise
    pub fn rotate_about(&mut self, cx: f64, cy: f64, radians: f64) -> &mut Self {
        self.translate(cx, cy).rotate(radians).translate(-cx, -cy)
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        let line = format!("{} w", fmt_num(width));
        self.write_line(&line)
    }

    /// Apply a named ExtGState resource (gs)
    pub fn set_graphics_state(&mut self, name: &str) -> &mut Self {
        let line = format!("/{name} gs");
        self.write_line(&line)
    }

    // =========================================================================
    // Color
    // =========================================================================

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        let (r, g, b) = color.to_unit_rgb();
        let line = format!("{} rg", fmt_all(&[r, g, b]));
        self.write_line(&line)
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        let (r, g, b) = color.to_unit_rgb();
        let line = format!("{} RG", fmt_all(&[r, g, b]));
        self.write_line(&line)
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let line = format!("{} m", fmt_all(&[x, y]));
        self.write_line(&line)
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        let line = format!("{} l", fmt_all(&[x, y]));
        self.write_line(&line)
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        let line = format!("{} c", fmt_all(&[x1, y1, x2, y2, x3, y3]));
        self.write_line(&line)
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let line = format!("{} re", fmt_all(&[x, y, width, height]));
        self.write_line(&line)
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.write_line("h")
    }

    /// Ellipse centered on `(cx, cy)` from four Bezier quarter arcs
    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) -> &mut Self {
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        self.move_to(cx + rx, cy)
            .curve_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry)
            .curve_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy)
            .curve_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry)
            .curve_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy)
            .close_path()
    }

    /// Rectangle with corners rounded by `radius`, clamped to half the
    /// shorter side
    pub fn rounded_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) -> &mut Self {
        let r = radius.min(width.abs() / 2.0).min(height.abs() / 2.0).max(0.0);
        if r == 0.0 {
            return self.rect(x, y, width, height);
        }
        let k = r * KAPPA;
        let (x1, y1) = (x + width, y + height);
        self.move_to(x + r, y)
            .line_to(x1 - r, y)
            .curve_to(x1 - r + k, y, x1, y + r - k, x1, y + r)
            .line_to(x1, y1 - r)
            .curve_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1)
            .line_to(x + r, y1)
            .curve_to(x + r - k, y1, x, y1 - r + k, x, y1 - r)
            .line_to(x, y + r)
            .curve_to(x, y + r - k, x + r - k, y, x + r, y)
            .close_path()
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.write_line("S")
    }

    pub fn fill(&mut self) -> &mut Self {
        self.write_line("f")
    }

    pub fn fill_and_stroke(&mut self) -> &mut Self {
        self.write_line("B")
    }

    /// A stroked straight segment
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        self.move_to(x1, y1).line_to(x2, y2).stroke()
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn begin_text(&mut self) -> &mut Self {
        self.write_line("BT")
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.write_line("ET")
    }

    pub fn set_font(&mut self, font_name: &str, size: f64) -> &mut Self {
        let line = format!("/{} {} Tf", font_name, fmt_num(size));
        self.write_line(&line)
    }

    pub fn set_text_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        let line = format!("{} Tm", fmt_all(&[a, b, c, d, e, f]));
        self.write_line(&line)
    }

    /// Show a string in WinAnsi encoding (Tj)
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.text_runs += 1;
        self.data.extend_from_slice(&escape_literal(&encode_win_ansi(text)));
        self.write_line(" Tj")
    }

    /// One line of text with its baseline origin at `(x, y)`, turned
    /// counterclockwise by `radians` about that origin
    pub fn text_line(&mut self, font_name: &str, size: f64, x: f64, y: f64, radians: f64, text: &str) -> &mut Self {
        let (sin, cos) = radians.sin_cos();
        self.begin_text()
            .set_font(font_name, size)
            .set_text_matrix(cos, sin, -sin, cos, x, y)
            .show_text(text)
            .end_text()
    }

    // =========================================================================
    // XObjects
    // =========================================================================

    /// Paint an image XObject into the box at `(x, y)` sized `width` by
    /// `height`
    pub fn draw_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.save_state().transform(width, 0.0, 0.0, height, x, y);
        let line = format!("/{name} Do");
        self.write_line(&line).restore_state()
    }

    fn write_line(&mut self, line: &str) -> &mut Self {
        // Writing into a Vec cannot fail
        let _ = writeln!(self.data, "{line}");
        self
    }
}

/// Format a number for a content stream
pub(crate) fn fmt_num(n: f64) -> String {
    let s = format_real((n * 10_000.0).round() / 10_000.0);
    if s == "-0" { "0".to_string() } else { s }
}

fn fmt_all(values: &[f64]) -> String {
    values.iter().map(|v| fmt_num(*v)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(cs: ContentStream) -> String {
        String::from_utf8(cs.into_bytes()).unwrap()
    }

    #[test]
    fn test_fill_rect() {
        let mut cs = ContentStream::new();
        cs.save_state()
            .set_fill_color(Color::rgb(255, 0, 0))
            .rect(100.0, 100.0, 200.0, 50.0)
            .fill()
            .restore_state();
        assert_eq!(text(cs), "q\n1 0 0 rg\n100 100 200 50 re\nf\nQ\n");
    }

    #[test]
    fn test_text_line() {
        let mut cs = ContentStream::new();
        cs.text_line("F1", 12.0, 72.0, 720.0, 0.0, "Hello (world)");
        assert_eq!(cs.text_runs(), 1);
        let content = text(cs);
        assert!(content.contains("/F1 12 Tf"));
        assert!(content.contains("1 0 0 1 72 720 Tm"));
        assert!(content.contains("(Hello \\(world\\)) Tj"));
    }

    #[test]
    fn test_rotate_about() {
        let mut cs = ContentStream::new();
        cs.rotate_about(10.0, 20.0, std::f64::consts::FRAC_PI_2);
        assert_eq!(text(cs), "1 0 0 1 10 20 cm\n0 1 -1 0 0 0 cm\n1 0 0 1 -10 -20 cm\n");
    }

    #[test]
    fn test_ellipse_is_four_curves() {
        let mut cs = ContentStream::new();
        cs.ellipse(50.0, 50.0, 10.0, 5.0).fill();
        let content = text(cs);
        assert_eq!(content.matches(" c\n").count(), 4);
        assert!(content.starts_with("60 50 m"));
    }

    #[test]
    fn test_rounded_rect_radius_clamped() {
        let mut square = ContentStream::new();
        square.rounded_rect(0.0, 0.0, 10.0, 10.0, 0.0);
        assert_eq!(text(square), "0 0 10 10 re\n");

        let mut round = ContentStream::new();
        round.rounded_rect(0.0, 0.0, 10.0, 4.0, 50.0);
        let content = text(round);
        assert_eq!(content.matches(" c\n").count(), 4);
        assert!(content.starts_with("2 0 m"));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(3.14159), "3.1416");
        assert_eq!(fmt_num(-0.00001), "0");
    }
}
