//! Element and page projection
//!
//! A projected box is the mm box converted to reference pixels and scaled by
//! the zoom factor. Rotation is carried as a separate presentation transform
//! about the box center; the box itself is never rotated, which keeps it in
//! agreement with the resize math in the interaction layer.

use crate::{CssTransform, Point, Rect, RenderError, Result};
use doc_model::{DesignState, Element, ElementId, ElementType, Page, PageId, Zoom};
use serde::{Deserialize, Serialize};

/// An element as it appears on screen, relative to the page's top-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedBox {
    pub element_id: ElementId,
    pub element_type: ElementType,
    /// Unrotated box in screen pixels
    pub rect: Rect,
    pub transform: CssTransform,
    pub z_index: i64,
    pub visible: bool,
    pub selected: bool,
}

impl ProjectedBox {
    /// Center of rotation in screen pixels
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    /// Whether a page-relative screen point falls inside the rotated box
    pub fn hit_test(&self, p: Point) -> bool {
        let local = p.rotated_about(self.center(), -self.transform.rotate);
        self.rect.contains(local)
    }
}

/// Maps mm-space geometry to screen pixels at one zoom level
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Projector {
    zoom: Zoom,
}

impl Projector {
    pub fn new(zoom: Zoom) -> Self {
        Self { zoom }
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn length(&self, mm: f64) -> f64 {
        self.zoom.mm_to_screen(mm)
    }

    /// Screen box of an element, without its rotation
    pub fn element_rect(&self, element: &Element) -> Rect {
        Rect::new(
            self.length(element.x),
            self.length(element.y),
            self.length(element.width),
            self.length(element.height),
        )
    }

    pub fn project(&self, element: &Element) -> ProjectedBox {
        ProjectedBox {
            element_id: element.id.clone(),
            element_type: element.element_type,
            rect: self.element_rect(element),
            transform: CssTransform::rotate(element.rotation),
            z_index: element.z_index,
            visible: !element.styles.is_hidden(),
            selected: false,
        }
    }

    /// Screen box of the page itself, at the origin
    pub fn page_rect(&self, page: &Page) -> Rect {
        let (width, height) = page.settings.size_mm();
        Rect::new(0.0, 0.0, self.length(width), self.length(height))
    }
}

/// Everything needed to paint one page of the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub page_id: PageId,
    pub page: Rect,
    /// Elements in paint order, bottom first
    pub elements: Vec<ProjectedBox>,
}

impl PageView {
    /// Topmost visible element under a page-relative point
    pub fn element_at(&self, p: Point) -> Option<&ProjectedBox> {
        self.elements
            .iter()
            .rev()
            .find(|b| b.visible && b.hit_test(p))
    }

    pub fn get(&self, id: &ElementId) -> Option<&ProjectedBox> {
        self.elements.iter().find(|b| &b.element_id == id)
    }
}

/// Project a page of the document at the document's zoom
pub fn project_page(state: &DesignState, page_id: &PageId) -> Result<PageView> {
    let page = state
        .page(page_id)
        .ok_or_else(|| RenderError::PageNotFound(page_id.to_string()))?;
    let projector = Projector::new(state.zoom);

    let elements = page
        .paint_order()
        .into_iter()
        .map(|el| ProjectedBox {
            selected: state.is_selected(&el.id),
            ..projector.project(el)
        })
        .collect();

    Ok(PageView {
        page_id: page.id.clone(),
        page: projector.page_rect(page),
        elements,
    })
}

/// Project the current page
pub fn project_current_page(state: &DesignState) -> Result<PageView> {
    project_page(state, &state.current_page_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::units::px_to_mm;
    use doc_model::{Styles, Visibility};

    fn shape(x_px: f64, y_px: f64, w_px: f64, h_px: f64) -> Element {
        Element::new(ElementType::Shape, px_to_mm(x_px), px_to_mm(y_px), px_to_mm(w_px), px_to_mm(h_px))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zoom_scales_box() {
        let el = shape(50.0, 60.0, 100.0, 40.0);
        let r = Projector::new(Zoom::snap(200.0)).element_rect(&el);
        assert!(close(r.x, 100.0) && close(r.y, 120.0));
        assert!(close(r.width, 200.0) && close(r.height, 80.0));
    }

    #[test]
    fn test_a4_page_at_actual_size() {
        let page = Page::new();
        let r = Projector::default().page_rect(&page);
        assert!((r.width - 793.7).abs() < 0.1);
        assert!((r.height - 1122.5).abs() < 0.1);
    }

    #[test]
    fn test_page_view_paint_order_and_selection() {
        let mut state = DesignState::default();
        let mut low = shape(0.0, 0.0, 10.0, 10.0);
        low.z_index = 1;
        let mut high = shape(0.0, 0.0, 10.0, 10.0);
        high.z_index = 5;
        let selected = high.id.clone();
        state.pages[0].elements = vec![high, low];
        state.selected_element_ids = vec![selected.clone()];

        let view = project_current_page(&state).unwrap();
        let order: Vec<i64> = view.elements.iter().map(|b| b.z_index).collect();
        assert_eq!(order, vec![1, 5]);
        assert!(view.get(&selected).unwrap().selected);
        assert_eq!(view.element_at(Point::new(5.0, 5.0)).unwrap().element_id, selected);
    }

    #[test]
    fn test_hidden_elements_are_not_hit() {
        let mut state = DesignState::default();
        let el = shape(0.0, 0.0, 10.0, 10.0).with_styles(Styles {
            visibility: Some(Visibility::Hidden),
            ..Default::default()
        });
        state.pages[0].elements.push(el);
        let view = project_current_page(&state).unwrap();
        assert!(!view.elements[0].visible);
        assert!(view.element_at(Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_hit_test_follows_rotation() {
        // 100x20 bar rotated upright about its center (50, 10)
        let el = shape(0.0, 0.0, 100.0, 20.0).with_rotation(90.0);
        let b = Projector::default().project(&el);
        assert!(b.hit_test(Point::new(50.0, -30.0)));
        assert!(!b.hit_test(Point::new(90.0, 10.0)));
    }

    #[test]
    fn test_unknown_page() {
        let state = DesignState::default();
        assert!(project_page(&state, &PageId::from("missing")).is_err());
    }
}
