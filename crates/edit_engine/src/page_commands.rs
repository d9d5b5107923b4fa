//! Page commands

use crate::{Command, EditError, Result};
use doc_model::{DesignState, Page, PageId, PageSettings, PageSettingsPatch};
use serde::{Deserialize, Serialize};

/// Merge a partial settings update into one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePageSettings {
    pub page_id: PageId,
    pub patch: PageSettingsPatch,
}

impl UpdatePageSettings {
    pub fn new(page_id: PageId, patch: PageSettingsPatch) -> Self {
        Self { page_id, patch }
    }
}

impl Command for UpdatePageSettings {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let page = next
            .page_mut(&self.page_id)
            .ok_or_else(|| EditError::PageNotFound(self.page_id.to_string()))?;
        page.settings.apply_patch(&self.patch);
        page.settings
            .validate()
            .map_err(|e| EditError::InvalidCommand(e.to_string()))?;
        Ok(next)
    }

    fn display_name(&self) -> &str {
        "Update Page Settings"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Append a page and make it current
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddPage {
    /// Settings for the new page; A4 portrait when absent
    #[serde(default)]
    pub settings: Option<PageSettings>,
}

impl Command for AddPage {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let mut page = Page::new();
        if let Some(settings) = &self.settings {
            page.settings = settings.clone();
        }
        next.current_page_id = page.id.clone();
        next.pages.push(page);
        next.selected_element_ids.clear();
        Ok(next)
    }

    fn display_name(&self) -> &str {
        "Add Page"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Remove a page. The last remaining page can never be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePage {
    pub page_id: PageId,
}

impl DeletePage {
    pub fn new(page_id: PageId) -> Self {
        Self { page_id }
    }
}

impl Command for DeletePage {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        if state.pages.len() <= 1 {
            return Err(EditError::InvalidCommand("cannot delete the last page".into()));
        }
        if state.page(&self.page_id).is_none() {
            return Err(EditError::PageNotFound(self.page_id.to_string()));
        }

        let mut next = state.clone();
        next.pages.retain(|p| p.id != self.page_id);
        if next.current_page_id == self.page_id {
            next.current_page_id = next.pages[0].id.clone();
            next.selected_element_ids.clear();
        }
        Ok(next)
    }

    fn display_name(&self) -> &str {
        "Delete Page"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Switch the current page and drop the selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCurrentPage {
    pub page_id: PageId,
}

impl SetCurrentPage {
    pub fn new(page_id: PageId) -> Self {
        Self { page_id }
    }
}

impl Command for SetCurrentPage {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        if state.page(&self.page_id).is_none() {
            return Err(EditError::PageNotFound(self.page_id.to_string()));
        }
        let mut next = state.clone();
        next.current_page_id = self.page_id.clone();
        next.selected_element_ids.clear();
        Ok(next)
    }

    fn records_history(&self) -> bool {
        false
    }

    fn display_name(&self) -> &str {
        "Set Current Page"
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}
