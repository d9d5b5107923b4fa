//! Commands that create, change and remove elements on the current page

use crate::command::{current_page_mut, element_mut, require_any};
use crate::{Command, Result};
use doc_model::units::px_to_mm;
use doc_model::{
    AlignItems, DesignState, Display, Element, ElementDraft, ElementId, ElementPatch,
    ElementType, JustifyContent, Styles,
};
use serde::{Deserialize, Serialize};

/// Offset applied to duplicated and pasted elements, in mm
pub const DUPLICATE_OFFSET_MM: f64 = 10.0;

/// Unit of the geometry carried by an [`ElementDraft`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftUnit {
    /// Reference pixels, as produced by toolbar insertion
    #[default]
    Px,
    /// Millimeters, as produced by generated layouts
    Mm,
}

impl DraftUnit {
    fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Px => px_to_mm(value),
            Self::Mm => value,
        }
    }
}

/// Default box of a new element in draft units: `(x, y, width, height)`
pub fn default_geometry(element_type: ElementType) -> (f64, f64, f64, f64) {
    match element_type {
        ElementType::Text => (50.0, 50.0, 200.0, 40.0),
        _ => (50.0, 50.0, 100.0, 100.0),
    }
}

/// Styles every new element starts with before the caller's styles apply
pub fn default_styles(element_type: ElementType) -> Styles {
    let is_text = element_type == ElementType::Text;
    Styles {
        position: Some("absolute".into()),
        display: Some(if is_text { Display::Flex } else { Display::Block }),
        align_items: is_text.then_some(AlignItems::Center),
        justify_content: is_text.then_some(JustifyContent::FlexStart),
        ..Default::default()
    }
}

/// Turn a draft into an element with a fresh id.
///
/// Missing geometry falls back to [`default_geometry`]; everything is
/// converted from `unit` into mm.
pub fn place_draft(draft: &ElementDraft, unit: DraftUnit, z_index: i64) -> Element {
    let (dx, dy, dw, dh) = default_geometry(draft.element_type);
    let mut element = Element::new(
        draft.element_type,
        unit.to_mm(draft.x.unwrap_or(dx)),
        unit.to_mm(draft.y.unwrap_or(dy)),
        unit.to_mm(draft.width.unwrap_or(dw)),
        unit.to_mm(draft.height.unwrap_or(dh)),
    )
    .with_rotation(draft.rotation.unwrap_or(0.0))
    .with_styles(default_styles(draft.element_type).merged(&draft.styles));
    element.content = draft.content.clone();
    element.z_index = z_index;
    element
}

/// Add one element on top of the current page and select it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddElement {
    pub draft: ElementDraft,
    #[serde(default)]
    pub unit: DraftUnit,
}

impl AddElement {
    /// Add a draft whose geometry is in reference pixels
    pub fn new(draft: ElementDraft) -> Self {
        Self { draft, unit: DraftUnit::Px }
    }

    pub fn in_mm(draft: ElementDraft) -> Self {
        Self { draft, unit: DraftUnit::Mm }
    }
}

impl Command for AddElement {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let page = current_page_mut(&mut next)?;
        let element = place_draft(&self.draft, self.unit, page.next_z_index());
        let id = element.id.clone();
        page.elements.push(element);
        next.selected_element_ids = vec![id];
        Ok(next)
    }

    fn display_name(&self) -> &str {
        "Add Element"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Add several elements in one step and select all of them.
///
/// Stacking order follows the order of the drafts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddElements {
    pub drafts: Vec<ElementDraft>,
    #[serde(default = "mm_unit")]
    pub unit: DraftUnit,
}

fn mm_unit() -> DraftUnit {
    DraftUnit::Mm
}

impl AddElements {
    /// Add drafts whose geometry is already in mm
    pub fn new(drafts: Vec<ElementDraft>) -> Self {
        Self { drafts, unit: DraftUnit::Mm }
    }
}

impl Command for AddElements {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let page = current_page_mut(&mut next)?;
        let base_z = page.next_z_index();
        let elements: Vec<Element> = self
            .drafts
            .iter()
            .zip(base_z..)
            .map(|(draft, z)| place_draft(draft, self.unit, z))
            .collect();
        let ids = elements.iter().map(|el| el.id.clone()).collect();
        page.elements.extend(elements);
        next.selected_element_ids = ids;
        Ok(next)
    }

    fn display_name(&self) -> &str {
        "Add Elements"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Merge a patch into one element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateElement {
    pub element_id: ElementId,
    pub patch: ElementPatch,
}

impl UpdateElement {
    pub fn new(element_id: ElementId, patch: ElementPatch) -> Self {
        Self { element_id, patch }
    }
}

impl Command for UpdateElement {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let page = current_page_mut(&mut next)?;
        element_mut(page, &self.element_id)?.apply_patch(&self.patch);
        Ok(next)
    }

    fn display_name(&self) -> &str {
        "Update Element"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Merge the same patch into several elements in one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateElements {
    pub element_ids: Vec<ElementId>,
    pub patch: ElementPatch,
}

impl Command for UpdateElements {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let page = current_page_mut(&mut next)?;
        require_any(page, &self.element_ids)?;
        for element in page
            .elements
            .iter_mut()
            .filter(|el| self.element_ids.contains(&el.id))
        {
            element.apply_patch(&self.patch);
        }
        Ok(next)
    }

    fn display_name(&self) -> &str {
        "Update Elements"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Remove elements from the current page and from the selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteElements {
    pub element_ids: Vec<ElementId>,
}

impl DeleteElements {
    pub fn new(element_ids: Vec<ElementId>) -> Self {
        Self { element_ids }
    }

    pub fn single(element_id: ElementId) -> Self {
        Self { element_ids: vec![element_id] }
    }
}

impl Command for DeleteElements {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let page = current_page_mut(&mut next)?;
        require_any(page, &self.element_ids)?;
        page.elements.retain(|el| !self.element_ids.contains(&el.id));
        next.selected_element_ids
            .retain(|id| !self.element_ids.contains(id));
        Ok(next)
    }

    fn display_name(&self) -> &str {
        if self.element_ids.len() == 1 {
            "Delete Element"
        } else {
            "Delete Elements"
        }
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Copy an element with an offset, put it on top and select it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateElement {
    pub element_id: ElementId,
}

impl DuplicateElement {
    pub fn new(element_id: ElementId) -> Self {
        Self { element_id }
    }
}

impl Command for DuplicateElement {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let page = current_page_mut(&mut next)?;
        let z_index = page.next_z_index();
        let copy = offset_copy(element_mut(page, &self.element_id)?, z_index);
        let id = copy.id.clone();
        page.elements.push(copy);
        next.selected_element_ids = vec![id];
        Ok(next)
    }

    fn display_name(&self) -> &str {
        "Duplicate Element"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Clone with a fresh id, shifted by [`DUPLICATE_OFFSET_MM`] on both axes
pub(crate) fn offset_copy(source: &Element, z_index: i64) -> Element {
    let mut copy = source.clone();
    copy.id = ElementId::new();
    copy.x += DUPLICATE_OFFSET_MM;
    copy.y += DUPLICATE_OFFSET_MM;
    copy.z_index = z_index;
    copy
}
