//! Design elements
//!
//! Every element is an axis-aligned box in page millimeters plus a rotation
//! about the box center. Paint order is ascending `z_index`; ties keep the
//! order in which elements were inserted.

use crate::units::normalize_rotation;
use crate::{ElementId, Styles};
use serde::{Deserialize, Serialize};

/// Smallest width or height an element may have, in mm
pub const MIN_ELEMENT_SIZE_MM: f64 = 0.1;

/// Kind of element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Image,
    Shape,
    Line,
}

impl ElementType {
    /// Parse a type name, falling back to `Text` for anything unknown
    pub fn parse_or_text(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "image" => Self::Image,
            "shape" => Self::Shape,
            "line" => Self::Line,
            _ => Self::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Shape => "shape",
            Self::Line => "line",
        }
    }
}

/// A placed element on a page. Geometry is in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, always in `[0, 360)`
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z_index: i64,
    /// Text body, or the source label of an image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub styles: Styles,
}

impl Element {
    /// Create an element with default styles at the given mm geometry
    pub fn new(element_type: ElementType, x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut element = Self {
            id: ElementId::new(),
            element_type,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
            content: None,
            styles: Styles::default(),
        };
        element.normalize();
        element
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_rotation(degrees);
        self
    }

    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    pub fn is_text(&self) -> bool {
        self.element_type == ElementType::Text
    }

    /// Text body, empty when absent
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Geometric center in mm
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rotation in radians
    pub fn rotation_radians(&self) -> f64 {
        self.rotation.to_radians()
    }

    /// Restore the geometric invariants after an edit: positive size,
    /// finite position and a normalized rotation.
    pub fn normalize(&mut self) {
        if !self.x.is_finite() {
            self.x = 0.0;
        }
        if !self.y.is_finite() {
            self.y = 0.0;
        }
        if !(self.width.is_finite() && self.width >= MIN_ELEMENT_SIZE_MM) {
            self.width = MIN_ELEMENT_SIZE_MM;
        }
        if !(self.height.is_finite() && self.height >= MIN_ELEMENT_SIZE_MM) {
            self.height = MIN_ELEMENT_SIZE_MM;
        }
        self.rotation = normalize_rotation(self.rotation);
    }

    /// Apply a merge patch: top-level fields replace, styles merge one level deep.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(t) = patch.element_type {
            self.element_type = t;
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(z) = patch.z_index {
            self.z_index = z;
        }
        if let Some(content) = &patch.content {
            self.content = Some(content.clone());
        }
        if let Some(styles) = &patch.styles {
            self.styles.merge(styles);
        }
        self.normalize();
    }
}

/// Partial update of an element. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<ElementType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// Position and size together, as produced by a resize gesture
    pub fn frame(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self { rotation: Some(degrees), ..Default::default() }
    }

    pub fn height(height: f64) -> Self {
        Self { height: Some(height), ..Default::default() }
    }

    pub fn z_index(z: i64) -> Self {
        Self { z_index: Some(z), ..Default::default() }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Default::default() }
    }

    pub fn styles(styles: Styles) -> Self {
        Self { styles: Some(styles), ..Default::default() }
    }

    /// Whether this patch touches anything that changes wrapped text height
    pub fn affects_text_layout(&self) -> bool {
        self.width.is_some() || self.content.is_some() || self.styles.is_some() || self.element_type.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An element description before it is placed: no id and no stacking order.
///
/// Absent geometry is filled in with defaults when the draft is inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDraft {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub styles: Styles,
}

impl ElementDraft {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            x: None,
            y: None,
            width: None,
            height: None,
            rotation: None,
            content: None,
            styles: Styles::default(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_element_json_shape() {
        let json = r##"{
            "id": "element-1",
            "type": "shape",
            "x": 10, "y": 20, "width": 30, "height": 40,
            "rotation": 45,
            "zIndex": 3,
            "styles": { "backgroundColor": "#3b82f6" }
        }"##;
        let el: Element = serde_json::from_str(json).unwrap();
        assert_eq!(el.element_type, ElementType::Shape);
        assert_eq!(el.z_index, 3);
        assert_eq!(el.styles.background_color, Some(Color::rgb(0x3b, 0x82, 0xf6)));

        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "shape");
        assert_eq!(value["zIndex"], 3);
    }

    #[test]
    fn test_patch_merges_styles() {
        let mut el = Element::new(ElementType::Text, 0.0, 0.0, 50.0, 10.0).with_styles(Styles {
            color: Some(Color::BLACK),
            font_family: Some("Arial".into()),
            ..Default::default()
        });
        let patch = ElementPatch {
            x: Some(5.0),
            styles: Some(Styles { color: Some(Color::WHITE), ..Default::default() }),
            ..Default::default()
        };
        el.apply_patch(&patch);

        assert_eq!(el.x, 5.0);
        assert_eq!(el.y, 0.0);
        assert_eq!(el.styles.color, Some(Color::WHITE));
        assert_eq!(el.styles.font_family.as_deref(), Some("Arial"));
    }

    #[test]
    fn test_patch_normalizes_rotation_and_size() {
        let mut el = Element::new(ElementType::Shape, 0.0, 0.0, 10.0, 10.0);
        el.apply_patch(&ElementPatch {
            rotation: Some(-30.0),
            width: Some(-4.0),
            ..Default::default()
        });
        assert_eq!(el.rotation, 330.0);
        assert_eq!(el.width, MIN_ELEMENT_SIZE_MM);
    }

    #[test]
    fn test_unknown_type_name_falls_back_to_text() {
        assert_eq!(ElementType::parse_or_text("circle"), ElementType::Text);
        assert_eq!(ElementType::parse_or_text("IMAGE"), ElementType::Image);
    }

    #[test]
    fn test_center() {
        let el = Element::new(ElementType::Shape, 10.0, 20.0, 30.0, 40.0);
        assert_eq!(el.center(), (25.0, 40.0));
    }
}
