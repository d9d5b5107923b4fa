//! Rulers, grid and margin guides

use crate::{Projector, Rect};
use doc_model::units::px_to_mm;
use doc_model::{Page, Zoom};
use serde::{Deserialize, Serialize};

/// Ruler ticks are placed every 50 screen pixels
pub const RULER_TICK_SPACING_PX: f64 = 50.0;

/// A labeled ruler tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulerTick {
    /// Offset along the ruler, in screen pixels
    pub offset: f64,
    /// Distance from the page edge, e.g. "13mm"
    pub label: String,
}

/// Ticks for a ruler spanning `length` screen pixels.
///
/// Labels give the page distance in whole mm at the current zoom.
pub fn ruler_ticks(length: f64, zoom: Zoom) -> Vec<RulerTick> {
    let count = (length / RULER_TICK_SPACING_PX).ceil().max(0.0) as usize;
    (0..count)
        .map(|i| {
            let offset = i as f64 * RULER_TICK_SPACING_PX;
            RulerTick {
                offset,
                label: format!("{}mm", px_to_mm(zoom.unapply(offset)).round()),
            }
        })
        .collect()
}

/// Horizontal and vertical rulers of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rulers {
    pub horizontal: Vec<RulerTick>,
    pub vertical: Vec<RulerTick>,
}

pub fn page_rulers(page: &Page, zoom: Zoom) -> Rulers {
    let rect = Projector::new(zoom).page_rect(page);
    Rulers {
        horizontal: ruler_ticks(rect.width, zoom),
        vertical: ruler_ticks(rect.height, zoom),
    }
}

/// Screen spacing of the background grid; `grid_size` is in reference pixels
pub fn grid_spacing(grid_size: f64, zoom: Zoom) -> f64 {
    zoom.apply(grid_size)
}

/// Offsets of the grid lines across one axis of `length` screen pixels
pub fn grid_lines(length: f64, grid_size: f64, zoom: Zoom) -> Vec<f64> {
    let spacing = grid_spacing(grid_size, zoom);
    if !(spacing > 0.0) {
        return Vec::new();
    }
    let count = (length / spacing).floor() as usize;
    (0..=count).map(|i| i as f64 * spacing).collect()
}

/// The dashed rectangle inside the page margins
pub fn margin_guide(page: &Page, zoom: Zoom) -> Rect {
    let projector = Projector::new(zoom);
    let page_rect = projector.page_rect(page);
    let m = page.settings.margins_mm();
    let (top, right, bottom, left) = (
        projector.length(m.top),
        projector.length(m.right),
        projector.length(m.bottom),
        projector.length(m.left),
    );
    Rect::new(
        left,
        top,
        (page_rect.width - left - right).max(0.0),
        (page_rect.height - top - bottom).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ruler_labels_at_actual_size() {
        let ticks = ruler_ticks(120.0, Zoom::ACTUAL_SIZE);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        // 50px = 13.23mm, 100px = 26.46mm
        assert_eq!(labels, vec!["0mm", "13mm", "26mm"]);
        assert_eq!(ticks[2].offset, 100.0);
    }

    #[test]
    fn test_ruler_labels_follow_zoom() {
        let ticks = ruler_ticks(120.0, Zoom::snap(200.0));
        assert_eq!(ticks[1].label, "7mm");
    }

    #[test]
    fn test_a4_ruler_tick_count() {
        let rulers = page_rulers(&Page::new(), Zoom::ACTUAL_SIZE);
        // ceil(793.7 / 50), ceil(1122.5 / 50)
        assert_eq!(rulers.horizontal.len(), 16);
        assert_eq!(rulers.vertical.len(), 23);
    }

    #[test]
    fn test_grid_spacing() {
        assert_eq!(grid_spacing(10.0, Zoom::snap(150.0)), 15.0);
        assert_eq!(grid_lines(31.0, 10.0, Zoom::ACTUAL_SIZE), vec![0.0, 10.0, 20.0, 30.0]);
        assert!(grid_lines(100.0, 0.0, Zoom::ACTUAL_SIZE).is_empty());
    }

    #[test]
    fn test_margin_guide() {
        let page = Page::new();
        let zoom = Zoom::snap(50.0);
        let guide = margin_guide(&page, zoom);
        let expected = zoom.mm_to_screen(20.0);
        assert!((guide.x - expected).abs() < 1e-9);
        assert!((guide.width - zoom.mm_to_screen(170.0)).abs() < 1e-9);
    }
}
