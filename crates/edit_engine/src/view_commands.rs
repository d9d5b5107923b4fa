//! Selection, view, clipboard and font list commands
//!
//! Apart from pasting, none of these create undo steps: they replace the
//! present state in place.

use crate::command::current_page_mut;
use crate::element_commands::offset_copy;
use crate::{Command, EditError, Result};
use doc_model::{CustomFont, DesignState, Element, ElementId, FontId, Zoom};
use serde::{Deserialize, Serialize};

macro_rules! view_command {
    ($display:literal) => {
        fn records_history(&self) -> bool {
            false
        }

        fn display_name(&self) -> &str {
            $display
        }

        fn clone_box(&self) -> Box<dyn Command> {
            Box::new(self.clone())
        }
    };
}

// ============================================================================
// Selection
// ============================================================================

/// Click selection: replace, or toggle membership with `multi`.
/// Selecting nothing clears the selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectElement {
    pub element_id: Option<ElementId>,
    #[serde(default)]
    pub multi: bool,
}

impl SelectElement {
    pub fn single(element_id: ElementId) -> Self {
        Self { element_id: Some(element_id), multi: false }
    }

    pub fn toggle(element_id: ElementId) -> Self {
        Self { element_id: Some(element_id), multi: true }
    }
}

impl Command for SelectElement {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        match &self.element_id {
            None => next.selected_element_ids.clear(),
            Some(id) if self.multi => {
                if let Some(pos) = next.selected_element_ids.iter().position(|s| s == id) {
                    next.selected_element_ids.remove(pos);
                } else {
                    next.selected_element_ids.push(id.clone());
                }
            }
            Some(id) => next.selected_element_ids = vec![id.clone()],
        }
        Ok(next)
    }

    view_command!("Select Element");
}

/// Replace the selection with exactly these ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectElements {
    pub element_ids: Vec<ElementId>,
}

impl Command for SelectElements {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        next.selected_element_ids = self.element_ids.clone();
        Ok(next)
    }

    view_command!("Select Elements");
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearSelection;

impl Command for ClearSelection {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        next.selected_element_ids.clear();
        Ok(next)
    }

    view_command!("Clear Selection");
}

// ============================================================================
// View settings
// ============================================================================

/// Zoom target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomChange {
    /// Snap an arbitrary percentage onto the ladder
    To(f64),
    In,
    Out,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetZoom {
    pub change: ZoomChange,
}

impl SetZoom {
    pub fn to(percent: f64) -> Self {
        Self { change: ZoomChange::To(percent) }
    }
}

impl Command for SetZoom {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        next.zoom = match self.change {
            ZoomChange::To(percent) => Zoom::snap(percent),
            ZoomChange::In => state.zoom.zoom_in(),
            ZoomChange::Out => state.zoom.zoom_out(),
        };
        Ok(next)
    }

    view_command!("Set Zoom");
}

/// Canvas overlays that can be switched on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewToggle {
    Grid,
    Rulers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleView {
    pub toggle: ViewToggle,
}

impl Command for ToggleView {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        match self.toggle {
            ViewToggle::Grid => next.show_grid = !next.show_grid,
            ViewToggle::Rulers => next.show_rulers = !next.show_rulers,
        }
        Ok(next)
    }

    view_command!("Toggle View");
}

/// Grid spacing in px; must be positive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetGridSize {
    pub size: f64,
}

impl Command for SetGridSize {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(EditError::InvalidCommand(format!("grid size {} is not positive", self.size)));
        }
        let mut next = state.clone();
        next.grid_size = self.size;
        Ok(next)
    }

    view_command!("Set Grid Size");
}

// ============================================================================
// Clipboard
// ============================================================================

/// Copy elements of the current page into the clipboard, in page order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyElements {
    pub element_ids: Vec<ElementId>,
}

impl Command for CopyElements {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let copied: Vec<Element> = current_page_mut(&mut next)?
            .elements
            .iter()
            .filter(|el| self.element_ids.contains(&el.id))
            .cloned()
            .collect();
        next.clipboard = copied;
        Ok(next)
    }

    view_command!("Copy");
}

/// Insert the clipboard onto the current page with fresh ids and an offset,
/// above everything else, and select the pasted elements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasteElements;

impl Command for PasteElements {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        if state.clipboard.is_empty() {
            return Err(EditError::InvalidCommand("clipboard is empty".into()));
        }
        let mut next = state.clone();
        let clipboard = std::mem::take(&mut next.clipboard);
        let page = current_page_mut(&mut next)?;
        let base_z = page.next_z_index();
        let pasted: Vec<Element> = clipboard
            .iter()
            .zip(base_z..)
            .map(|(el, z)| offset_copy(el, z))
            .collect();
        let ids = pasted.iter().map(|el| el.id.clone()).collect();
        page.elements.extend(pasted);
        next.selected_element_ids = ids;
        next.clipboard = clipboard;
        Ok(next)
    }

    fn display_name(&self) -> &str {
        "Paste"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

// ============================================================================
// Fonts
// ============================================================================

/// Record a font whose data has already been loaded and validated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterFont {
    pub font: CustomFont,
}

impl Command for RegisterFont {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        if !self.font.loaded {
            return Err(EditError::FontLoad {
                family: self.font.family.clone(),
                reason: "font data was not loaded".into(),
            });
        }
        if state.font(&self.font.id).is_some() {
            return Err(EditError::FontLoad {
                family: self.font.family.clone(),
                reason: format!("font {} is already registered", self.font.id),
            });
        }
        let mut next = state.clone();
        next.custom_fonts.push(self.font.clone());
        Ok(next)
    }

    view_command!("Add Font");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveCustomFont {
    pub font_id: FontId,
}

impl Command for RemoveCustomFont {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        if state.font(&self.font_id).is_none() {
            return Err(EditError::InvalidCommand(format!("unknown font {}", self.font_id)));
        }
        let mut next = state.clone();
        next.custom_fonts.retain(|f| f.id != self.font_id);
        Ok(next)
    }

    view_command!("Remove Font");
}
