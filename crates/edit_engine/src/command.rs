//! Command system for design editing
//!
//! Every command is a pure function from one `DesignState` to the next. The
//! session decides whether the result becomes a new history entry or just
//! replaces the present state (selection, view and clipboard changes).

use crate::{EditError, Result};
use doc_model::{DesignState, Element, ElementId, Page};

/// Trait for all editing commands
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Produce the next state. `state` is never modified.
    fn apply(&self, state: &DesignState) -> Result<DesignState>;

    /// Whether applying this command creates an undo step
    fn records_history(&self) -> bool {
        true
    }

    /// Get a display name for this command
    fn display_name(&self) -> &str;

    /// Clone this command into a box
    fn clone_box(&self) -> Box<dyn Command>;
}

impl Clone for Box<dyn Command> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

// ============================================================================
// Helpers shared by the command modules
// ============================================================================

/// The current page of a state being edited
pub(crate) fn current_page_mut(state: &mut DesignState) -> Result<&mut Page> {
    let id = state.current_page_id.clone();
    state
        .page_mut(&id)
        .ok_or_else(|| EditError::PageNotFound(id.to_string()))
}

/// An element of the current page
pub(crate) fn element_mut<'a>(page: &'a mut Page, id: &ElementId) -> Result<&'a mut Element> {
    page.element_mut(id)
        .ok_or_else(|| EditError::ElementNotFound(id.to_string()))
}

/// Fail when none of `ids` exist on the page
pub(crate) fn require_any(page: &Page, ids: &[ElementId]) -> Result<()> {
    if ids.iter().any(|id| page.contains(id)) {
        Ok(())
    } else {
        Err(EditError::ElementNotFound(
            ids.iter().map(ElementId::as_str).collect::<Vec<_>>().join(", "),
        ))
    }
}
