//! Complete editor document state
//!
//! `DesignState` is the unit of history snapshots and of persistence: every
//! edit produces a new value and the previous one is kept untouched.

use crate::units::Zoom;
use crate::{Element, ElementId, FontId, Page, PageId};
use serde::{Deserialize, Serialize};

/// Id of the page every new document starts with
pub const INITIAL_PAGE_ID: &str = "page-1";

/// Default grid spacing in px
pub const DEFAULT_GRID_SIZE: f64 = 10.0;

/// A user supplied font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFont {
    pub id: FontId,
    /// Display name
    pub name: String,
    /// Family name used in `font-family`
    pub family: String,
    /// Where the font data was loaded from
    pub url: String,
    /// Container format, e.g. "truetype" or "opentype"
    pub format: String,
    /// Set only once the font data has been validated
    #[serde(default)]
    pub loaded: bool,
}

/// Pages, selection, view settings, fonts and clipboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignState {
    pub pages: Vec<Page>,
    pub current_page_id: PageId,
    #[serde(default)]
    pub selected_element_ids: Vec<ElementId>,
    #[serde(default)]
    pub zoom: Zoom,
    #[serde(default)]
    pub show_grid: bool,
    #[serde(default = "default_true")]
    pub show_rulers: bool,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default)]
    pub custom_fonts: Vec<CustomFont>,
    #[serde(default)]
    pub clipboard: Vec<Element>,
}

fn default_true() -> bool {
    true
}

fn default_grid_size() -> f64 {
    DEFAULT_GRID_SIZE
}

impl Default for DesignState {
    /// One empty A4 page with id `page-1`, 100% zoom, rulers on, grid off
    fn default() -> Self {
        Self {
            pages: vec![Page::with_id(PageId::from(INITIAL_PAGE_ID))],
            current_page_id: PageId::from(INITIAL_PAGE_ID),
            selected_element_ids: Vec::new(),
            zoom: Zoom::ACTUAL_SIZE,
            show_grid: false,
            show_rulers: true,
            grid_size: DEFAULT_GRID_SIZE,
            custom_fonts: Vec::new(),
            clipboard: Vec::new(),
        }
    }
}

impl DesignState {
    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    pub fn page_mut(&mut self, id: &PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| &p.id == id)
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.page(&self.current_page_id)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        let id = self.current_page_id.clone();
        self.page_mut(&id)
    }

    /// Look up an element on the current page
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.current_page()?.element(id)
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected_element_ids.contains(id)
    }

    /// Selected elements on the current page, in selection order
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.selected_element_ids
            .iter()
            .filter_map(|id| self.element(id))
            .collect()
    }

    /// Drop selection entries that no longer exist on the current page
    pub fn prune_selection(&mut self) {
        let Some(page) = self.current_page() else {
            self.selected_element_ids.clear();
            return;
        };
        let keep: Vec<ElementId> = self
            .selected_element_ids
            .iter()
            .filter(|id| page.contains(id))
            .cloned()
            .collect();
        self.selected_element_ids = keep;
    }

    pub fn font(&self, id: &FontId) -> Option<&CustomFont> {
        self.custom_fonts.iter().find(|f| &f.id == id)
    }

    /// Total number of elements across all pages
    pub fn element_count(&self) -> usize {
        self.pages.iter().map(|p| p.elements.len()).sum()
    }
}
