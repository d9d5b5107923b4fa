//! Screen-space geometry

use serde::{Deserialize, Serialize};

/// A point in screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate this point by `degrees` (clockwise on screen) about `origin`
    pub fn rotated_about(self, origin: Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;
        Point::new(origin.x + dx * cos - dy * sin, origin.y + dx * sin + dy * cos)
    }

    /// Angle of the vector from `origin` to this point, in degrees
    pub fn angle_from(self, origin: Point) -> f64 {
        (self.y - origin.y).atan2(self.x - origin.x).to_degrees()
    }
}

/// An axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Shift by an offset, e.g. from page-relative to client coordinates
    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Presentation transform of a projected box: a rotation about the box's
/// own center, applied after translation and sizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CssTransform {
    /// Degrees, clockwise on screen
    pub rotate: f64,
}

impl CssTransform {
    pub fn rotate(degrees: f64) -> Self {
        Self { rotate: degrees }
    }

    pub fn is_identity(&self) -> bool {
        self.rotate == 0.0
    }

    /// The CSS `transform` property value
    pub fn to_css(&self) -> String {
        format!("rotate({}deg)", self.rotate)
    }
}
