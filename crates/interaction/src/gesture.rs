//! Pointer gesture state
//!
//! At most one gesture is active at a time. Each variant carries the anchors
//! captured at pointer-down; every pointer-move is computed from those
//! anchors, never from the previous move.

use crate::{drag_position, resize_frame, resize_text_width, rotate_angle, Frame};
use doc_model::{ElementId, Zoom};
use render_model::{Point, ResizeHandle};

/// Moving an element with the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub element_id: ElementId,
    pub start: Point,
    pub initial_x: f64,
    pub initial_y: f64,
}

impl DragGesture {
    pub fn position_at(&self, p: Point, zoom: Zoom) -> (f64, f64) {
        drag_position(
            self.initial_x,
            self.initial_y,
            p.x - self.start.x,
            p.y - self.start.y,
            zoom,
        )
    }
}

/// Dragging a resize handle
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    pub element_id: ElementId,
    pub handle: ResizeHandle,
    pub start: Point,
    pub initial: Frame,
}

impl ResizeGesture {
    /// Frame for the pointer at `p`; text elements only change width here
    pub fn frame_at(&self, p: Point, zoom: Zoom, rotation: f64, is_text: bool) -> Frame {
        let (dx, dy) = (p.x - self.start.x, p.y - self.start.y);
        if is_text {
            resize_text_width(self.initial, rotation, self.handle, dx, dy, zoom)
        } else {
            resize_frame(self.initial, rotation, self.handle, dx, dy, zoom)
        }
    }
}

/// Dragging the rotate handle around the element center
#[derive(Debug, Clone, PartialEq)]
pub struct RotateGesture {
    pub element_id: ElementId,
    /// Screen-space center of the projected box
    pub center: Point,
    /// Pointer angle at pointer-down, in degrees
    pub start_angle: f64,
    pub initial_rotation: f64,
}

impl RotateGesture {
    pub fn rotation_at(&self, p: Point) -> f64 {
        rotate_angle(self.initial_rotation, self.start_angle, p.angle_from(self.center))
    }
}

/// The single gesture slot
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragGesture),
    Resizing(ResizeGesture),
    Rotating(RotateGesture),
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Element targeted by the active gesture
    pub fn element_id(&self) -> Option<&ElementId> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging(g) => Some(&g.element_id),
            GestureState::Resizing(g) => Some(&g.element_id),
            GestureState::Rotating(g) => Some(&g.element_id),
        }
    }

    /// Element whose height the active resize owns
    pub fn resizing(&self) -> Option<&ElementId> {
        match self {
            GestureState::Resizing(g) => Some(&g.element_id),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Dragging(_) => "dragging",
            GestureState::Resizing(_) => "resizing",
            GestureState::Rotating(_) => "rotating",
        }
    }
}
