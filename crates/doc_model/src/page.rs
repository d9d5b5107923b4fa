//! Pages and page settings

use crate::units::{in_to_mm, px_to_mm};
use crate::{Color, DocModelError, Element, ElementId, PageId, Result};
use serde::{Deserialize, Serialize};

/// Default A4 page width in mm
pub const A4_WIDTH_MM: f64 = 210.0;
/// Default A4 page height in mm
pub const A4_HEIGHT_MM: f64 = 297.0;
/// Default page margin in mm
pub const DEFAULT_MARGIN_MM: f64 = 20.0;

/// Unit in which a page declares its size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageUnit {
    Px,
    #[default]
    Mm,
    In,
}

impl PageUnit {
    /// Convert a value in this unit to millimeters
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Px => px_to_mm(value),
            Self::Mm => value,
            Self::In => in_to_mm(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins, in the page's unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn uniform(value: f64) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN_MM)
    }
}

/// Page geometry and background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: PageUnit,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default = "default_background")]
    pub background_color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

fn default_background() -> Color {
    Color::WHITE
}

impl Default for PageSettings {
    /// A4 portrait, 20mm margins, white background
    fn default() -> Self {
        Self {
            width: A4_WIDTH_MM,
            height: A4_HEIGHT_MM,
            unit: PageUnit::Mm,
            orientation: Orientation::Portrait,
            margins: Margins::default(),
            background_color: Color::WHITE,
            background_image: None,
        }
    }
}

impl PageSettings {
    /// Page size normalized to millimeters
    pub fn size_mm(&self) -> (f64, f64) {
        (self.unit.to_mm(self.width), self.unit.to_mm(self.height))
    }

    /// Margins normalized to millimeters
    pub fn margins_mm(&self) -> Margins {
        let m = self.margins;
        Margins {
            top: self.unit.to_mm(m.top),
            right: self.unit.to_mm(m.right),
            bottom: self.unit.to_mm(m.bottom),
            left: self.unit.to_mm(m.left),
        }
    }

    /// Switch orientation, swapping width and height when it changes
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.orientation != orientation {
            std::mem::swap(&mut self.width, &mut self.height);
            self.orientation = orientation;
        }
    }

    /// Apply a partial update
    pub fn apply_patch(&mut self, patch: &PageSettingsPatch) {
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(orientation) = patch.orientation {
            self.orientation = orientation;
        }
        if let Some(margins) = &patch.margins {
            margins.apply_to(&mut self.margins);
        }
        if let Some(color) = patch.background_color {
            self.background_color = color;
        }
        if let Some(image) = &patch.background_image {
            self.background_image = Some(image.clone());
        }
    }

    /// Check that the page has a drawable size
    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.size_mm();
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(DocModelError::InvalidPageSettings(format!(
                "page size must be positive, got {}x{} {:?}",
                self.width, self.height, self.unit
            )));
        }
        Ok(())
    }
}

/// Partial margins update
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
}

impl MarginsPatch {
    fn apply_to(&self, margins: &mut Margins) {
        if let Some(v) = self.top {
            margins.top = v;
        }
        if let Some(v) = self.right {
            margins.right = v;
        }
        if let Some(v) = self.bottom {
            margins.bottom = v;
        }
        if let Some(v) = self.left {
            margins.left = v;
        }
    }
}

/// Partial page settings update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<PageUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<MarginsPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

/// A page and the elements placed on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub settings: PageSettings,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Page {
    /// Empty A4 page with a fresh id
    pub fn new() -> Self {
        Self::with_id(PageId::new())
    }

    pub fn with_id(id: PageId) -> Self {
        Self {
            id,
            settings: PageSettings::default(),
            elements: Vec::new(),
        }
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| &el.id == id)
    }

    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| &el.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.element(id).is_some()
    }

    /// Highest stacking order on the page, 0 when empty
    pub fn max_z_index(&self) -> i64 {
        self.elements.iter().map(|el| el.z_index).max().unwrap_or(0).max(0)
    }

    /// Stacking order for an element placed on top of everything
    pub fn next_z_index(&self) -> i64 {
        self.max_z_index() + 1
    }

    /// Elements in paint order: ascending z-index, insertion order on ties
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().collect();
        // sort_by_key is stable
        sorted.sort_by_key(|el| el.z_index);
        sorted
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementType;

    #[test]
    fn test_default_settings_are_a4() {
        let settings = PageSettings::default();
        assert_eq!(settings.size_mm(), (210.0, 297.0));
        assert_eq!(settings.margins, Margins::uniform(20.0));
        assert!(settings.background_color.is_white());
    }

    #[test]
    fn test_size_normalization() {
        let settings = PageSettings {
            width: 8.5,
            height: 11.0,
            unit: PageUnit::In,
            ..Default::default()
        };
        let (w, h) = settings.size_mm();
        assert!((w - 215.9).abs() < 1e-9);
        assert!((h - 279.4).abs() < 1e-9);

        let px = PageSettings { width: 96.0, height: 96.0, unit: PageUnit::Px, ..Default::default() };
        assert!((px.size_mm().0 - 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_patch_merges_margins() {
        let mut settings = PageSettings::default();
        settings.apply_patch(&PageSettingsPatch {
            margins: Some(MarginsPatch { top: Some(5.0), ..Default::default() }),
            background_color: Some(Color::BLACK),
            ..Default::default()
        });
        assert_eq!(settings.margins.top, 5.0);
        assert_eq!(settings.margins.left, 20.0);
        assert_eq!(settings.background_color, Color::BLACK);
    }

    #[test]
    fn test_orientation_swap() {
        let mut settings = PageSettings::default();
        settings.set_orientation(Orientation::Landscape);
        assert_eq!(settings.size_mm(), (297.0, 210.0));
        settings.set_orientation(Orientation::Landscape);
        assert_eq!(settings.size_mm(), (297.0, 210.0));
    }

    #[test]
    fn test_validate_rejects_empty_page() {
        let settings = PageSettings { width: 0.0, ..Default::default() };
        assert!(settings.validate().is_err());
        assert!(PageSettings::default().validate().is_ok());
    }

    #[test]
    fn test_paint_order_is_stable() {
        let mut page = Page::new();
        let mut a = Element::new(ElementType::Shape, 0.0, 0.0, 1.0, 1.0);
        a.z_index = 2;
        let mut b = Element::new(ElementType::Shape, 0.0, 0.0, 1.0, 1.0);
        b.z_index = 1;
        let mut c = Element::new(ElementType::Shape, 0.0, 0.0, 1.0, 1.0);
        c.z_index = 2;
        page.elements = vec![a.clone(), b.clone(), c.clone()];

        let order: Vec<_> = page.paint_order().into_iter().map(|e| e.id.clone()).collect();
        assert_eq!(order, vec![b.id, a.id, c.id]);
        assert_eq!(page.next_z_index(), 3);
    }

    #[test]
    fn test_empty_page_next_z_index() {
        assert_eq!(Page::new().next_z_index(), 1);
    }
}
