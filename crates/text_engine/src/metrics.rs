//! Advance widths of the PDF standard fonts
//!
//! Widths are in thousandths of an em for the printable ASCII range
//! (0x20..=0x7E), taken from the Adobe Core 14 AFM files. Oblique faces of
//! Helvetica and Courier share the upright widths exactly. Times Bold Italic
//! reuses the Times Bold table.

use crate::StandardFamily;

const FIRST_CHAR: u32 = 0x20;
const LAST_CHAR: u32 = 0x7E;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[rustfmt::skip]
const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

/// Every Courier glyph is 600 units wide
const COURIER_WIDTH: u16 = 600;

/// Per-face metrics: widths plus the vertical extents used for line boxes
#[derive(Debug, Clone, Copy)]
pub struct FaceMetrics {
    widths: Option<&'static [u16; 95]>,
    /// Width used for characters outside the table
    pub default_width: u16,
    /// Ascender in thousandths of an em
    pub ascender: i16,
    /// Descender in thousandths of an em (negative)
    pub descender: i16,
    /// `line-height: normal` as a multiple of the font size
    pub normal_line_height: f64,
}

impl FaceMetrics {
    /// Advance width of a single character in thousandths of an em
    pub fn advance(&self, c: char) -> u16 {
        let code = c as u32;
        match self.widths {
            Some(table) if (FIRST_CHAR..=LAST_CHAR).contains(&code) => {
                table[(code - FIRST_CHAR) as usize]
            }
            Some(_) => self.default_width,
            None => COURIER_WIDTH,
        }
    }

    /// Advance width of a string at the given font size, in the size's unit
    pub fn string_width(&self, text: &str, size: f64) -> f64 {
        let units: u32 = text
            .chars()
            .filter(|c| !c.is_control())
            .map(|c| self.advance(c) as u32)
            .sum();
        units as f64 * size / 1000.0
    }
}

/// Look up metrics for one of the twelve standard text faces
pub fn face_metrics(family: StandardFamily, bold: bool, italic: bool) -> FaceMetrics {
    match family {
        StandardFamily::Helvetica => FaceMetrics {
            widths: Some(if bold { &HELVETICA_BOLD } else { &HELVETICA }),
            default_width: 556,
            ascender: 718,
            descender: -207,
            normal_line_height: 1.15,
        },
        StandardFamily::Times => FaceMetrics {
            widths: Some(match (bold, italic) {
                (true, _) => &TIMES_BOLD,
                (false, true) => &TIMES_ITALIC,
                (false, false) => &TIMES_ROMAN,
            }),
            default_width: 500,
            ascender: 683,
            descender: -217,
            normal_line_height: 1.15,
        },
        StandardFamily::Courier => FaceMetrics {
            widths: None,
            default_width: COURIER_WIDTH,
            ascender: 629,
            descender: -157,
            normal_line_height: 1.133,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        let helv = face_metrics(StandardFamily::Helvetica, false, false);
        assert_eq!(helv.advance(' '), 278);
        assert_eq!(helv.advance('A'), 667);
        assert_eq!(helv.advance('m'), 833);
        assert_eq!(helv.advance('~'), 584);

        let times = face_metrics(StandardFamily::Times, false, false);
        assert_eq!(times.advance('a'), 444);

        let bold = face_metrics(StandardFamily::Helvetica, true, false);
        assert_eq!(bold.advance('b'), 611);
    }

    #[test]
    fn test_courier_is_monospaced() {
        let courier = face_metrics(StandardFamily::Courier, false, false);
        assert_eq!(courier.string_width("iiii", 10.0), courier.string_width("MMMM", 10.0));
        assert_eq!(courier.string_width("abc", 10.0), 18.0);
    }

    #[test]
    fn test_non_ascii_uses_default_width() {
        let helv = face_metrics(StandardFamily::Helvetica, false, false);
        assert_eq!(helv.advance('é'), 556);
    }

    #[test]
    fn test_string_width_scales_with_size() {
        let helv = face_metrics(StandardFamily::Helvetica, false, false);
        let w12 = helv.string_width("Hello", 12.0);
        let w24 = helv.string_width("Hello", 24.0);
        assert!((w24 - 2.0 * w12).abs() < 1e-9);
        // H e l l o = 722 + 556 + 222 + 222 + 556
        assert!((w12 - 2278.0 * 12.0 / 1000.0).abs() < 1e-9);
    }
}
