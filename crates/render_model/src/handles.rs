//! Resize and rotate handles of a selected element

use crate::{Point, ProjectedBox};
use doc_model::ElementType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of a resize handle, in screen pixels
pub const HANDLE_SIZE_PX: f64 = 8.0;
/// Distance of the rotate handle above the box, in screen pixels
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 20.0;
/// Diameter of the rotate handle
pub const ROTATE_HANDLE_SIZE_PX: f64 = 12.0;

/// Compass position of a resize handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
    ];

    /// Text height is derived from its content, so only width handles exist
    pub const TEXT: [ResizeHandle; 2] = [ResizeHandle::W, ResizeHandle::E];

    /// Handles offered for an element type
    pub fn for_type(element_type: ElementType) -> &'static [ResizeHandle] {
        match element_type {
            ElementType::Text => &Self::TEXT,
            _ => &Self::ALL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
            ResizeHandle::Ne => "ne",
            ResizeHandle::Nw => "nw",
            ResizeHandle::Se => "se",
            ResizeHandle::Sw => "sw",
        }
    }

    pub fn has_north(&self) -> bool {
        self.as_str().contains('n')
    }

    pub fn has_south(&self) -> bool {
        self.as_str().contains('s')
    }

    pub fn has_east(&self) -> bool {
        self.as_str().contains('e')
    }

    pub fn has_west(&self) -> bool {
        self.as_str().contains('w')
    }

    /// Position on the unit box, `(0,0)` top-left to `(1,1)` bottom-right
    fn anchor(&self) -> (f64, f64) {
        let fx = if self.has_west() {
            0.0
        } else if self.has_east() {
            1.0
        } else {
            0.5
        };
        let fy = if self.has_north() {
            0.0
        } else if self.has_south() {
            1.0
        } else {
            0.5
        };
        (fx, fy)
    }

    /// Cursor shown over the handle
    pub fn cursor(&self) -> String {
        format!("{}-resize", self.as_str())
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| format!("unknown resize handle: {s}"))
    }
}

/// What a pointer-down landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHit {
    Resize(ResizeHandle),
    Rotate,
}

/// Center of a resize handle on screen, rotated with its element
pub fn handle_center(b: &ProjectedBox, handle: ResizeHandle) -> Point {
    let (fx, fy) = handle.anchor();
    let unrotated = Point::new(b.rect.x + b.rect.width * fx, b.rect.y + b.rect.height * fy);
    unrotated.rotated_about(b.center(), b.transform.rotate)
}

/// Center of the rotate handle, above the top edge
pub fn rotate_handle_center(b: &ProjectedBox) -> Point {
    let unrotated = Point::new(
        b.rect.x + b.rect.width / 2.0,
        b.rect.y - ROTATE_HANDLE_OFFSET_PX + ROTATE_HANDLE_SIZE_PX / 2.0,
    );
    unrotated.rotated_about(b.center(), b.transform.rotate)
}

/// Find the handle of a selected box under a page-relative point
pub fn hit_handle(b: &ProjectedBox, p: Point) -> Option<HandleHit> {
    let near = |c: Point, half: f64| (p.x - c.x).abs() <= half && (p.y - c.y).abs() <= half;

    if near(rotate_handle_center(b), ROTATE_HANDLE_SIZE_PX / 2.0) {
        return Some(HandleHit::Rotate);
    }
    ResizeHandle::for_type(b.element_type)
        .iter()
        .copied()
        .find(|&h| near(handle_center(b, h), HANDLE_SIZE_PX / 2.0))
        .map(HandleHit::Resize)
}
