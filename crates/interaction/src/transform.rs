//! Drag, resize and rotate math
//!
//! Pointer deltas arrive in screen pixels. They are unscaled by the zoom
//! factor and converted to mm before being applied. Resize deltas are first
//! rotated into the element's local frame, because its handles are drawn
//! rotated with it.

use doc_model::units::{normalize_rotation, px_to_mm};
use doc_model::{Element, Zoom};
use render_model::ResizeHandle;
use serde::{Deserialize, Serialize};

/// Smallest width or height a resize can produce, in reference pixels
pub const MIN_RESIZE_PX: f64 = 20.0;
/// Smallest width a text resize can produce, in reference pixels
pub const MIN_TEXT_WIDTH_PX: f64 = 40.0;

pub fn min_resize_mm() -> f64 {
    px_to_mm(MIN_RESIZE_PX)
}

pub fn min_text_width_mm() -> f64 {
    px_to_mm(MIN_TEXT_WIDTH_PX)
}

/// Position and size of an element in mm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn of(element: &Element) -> Self {
        Self {
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
        }
    }
}

/// A screen-space pointer delta in mm along the page axes
pub fn screen_delta_to_mm(dx: f64, dy: f64, zoom: Zoom) -> (f64, f64) {
    (zoom.screen_to_mm(dx), zoom.screen_to_mm(dy))
}

/// Express a page-axis delta in an element's unrotated frame
pub fn to_local_frame(dx: f64, dy: f64, rotation_degrees: f64) -> (f64, f64) {
    let (sin, cos) = (-rotation_degrees.to_radians()).sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}

/// Express a local-frame offset along the page axes
fn to_page_frame(dx: f64, dy: f64, rotation_degrees: f64) -> (f64, f64) {
    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}

/// New position of a dragged element. Dragging follows the screen axes
/// whatever the element's rotation, and is not clamped to the page.
pub fn drag_position(anchor_x: f64, anchor_y: f64, dx: f64, dy: f64, zoom: Zoom) -> (f64, f64) {
    let (mx, my) = screen_delta_to_mm(dx, dy, zoom);
    (anchor_x + mx, anchor_y + my)
}

/// Resize a non-text element from the frame it had at pointer-down.
///
/// Edges moved by the handle follow the local delta; width and height are
/// floored at [`min_resize_mm`]. When a west or north edge moves, the
/// origin shifts by the size change expressed along the page axes.
pub fn resize_frame(
    initial: Frame,
    rotation: f64,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    zoom: Zoom,
) -> Frame {
    let (sx, sy) = screen_delta_to_mm(dx, dy, zoom);
    let (ldx, ldy) = to_local_frame(sx, sy, rotation);
    let min = min_resize_mm();

    let mut width = initial.width;
    let mut height = initial.height;
    if handle.has_east() {
        width = (initial.width + ldx).max(min);
    } else if handle.has_west() {
        width = (initial.width - ldx).max(min);
    }
    if handle.has_south() {
        height = (initial.height + ldy).max(min);
    } else if handle.has_north() {
        height = (initial.height - ldy).max(min);
    }

    let shift_x = if handle.has_west() { initial.width - width } else { 0.0 };
    let shift_y = if handle.has_north() { initial.height - height } else { 0.0 };
    let (px, py) = to_page_frame(shift_x, shift_y, rotation);

    Frame {
        x: initial.x + px,
        y: initial.y + py,
        width,
        height,
    }
}

/// Resize the width of a text element. North and south have no effect;
/// the height is left for the caller to re-measure.
pub fn resize_text_width(
    initial: Frame,
    rotation: f64,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    zoom: Zoom,
) -> Frame {
    let (sx, sy) = screen_delta_to_mm(dx, dy, zoom);
    let (ldx, _) = to_local_frame(sx, sy, rotation);
    let min = min_text_width_mm();

    let mut frame = initial;
    if handle.has_east() {
        frame.width = (initial.width + ldx).max(min);
    } else if handle.has_west() {
        frame.width = (initial.width - ldx).max(min);
        let (px, py) = to_page_frame(initial.width - frame.width, 0.0, rotation);
        frame.x = initial.x + px;
        frame.y = initial.y + py;
    }
    frame
}

/// Rotation after the pointer swept from `start_angle` to `current_angle`
/// about the element center, rounded to hundredths of a degree
pub fn rotate_angle(initial_rotation: f64, start_angle: f64, current_angle: f64) -> f64 {
    let raw = initial_rotation + (current_angle - start_angle);
    normalize_rotation((normalize_rotation(raw) * 100.0).round() / 100.0)
}
