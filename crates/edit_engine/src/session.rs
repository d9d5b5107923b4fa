//! Editing session: the single writer of the document
//!
//! The session owns the history and the loaded custom fonts. Commands that
//! refer to missing pages or elements, or that are refused (deleting the
//! last page, pasting an empty clipboard), leave the state untouched and
//! report `false` instead of failing.

use crate::{
    load_font, parse_generated_layout, AddElement, AddElements, AddPage, ChangeZOrder,
    ClearSelection, Command, CopyElements, DeleteElements, DeletePage, DuplicateElement,
    EditError, EditorSettings, FontSource, History, PasteElements, RegisterFont,
    RemoveCustomFont, Result, SelectElement, SelectElements, SetCurrentPage, SetGridSize,
    SetZoom, ToggleView, UpdateElement, UpdateElements, UpdatePageSettings, ViewToggle,
    ZOrderChange, ZoomChange,
};
use doc_model::{
    DesignState, ElementDraft, ElementId, ElementPatch, FontId, PageId, PageSettingsPatch,
};
use std::sync::Arc;
use text_engine::FontLibrary;

/// The editing session
pub struct EditSession {
    history: History,
    fonts: FontLibrary,
    settings: EditorSettings,
}

impl EditSession {
    /// Create a session with an empty document
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let state = settings.initial_state();
        Self {
            history: History::with_limit(state, settings.history_limit),
            fonts: FontLibrary::new(),
            settings,
        }
    }

    /// Create a session around an existing document, e.g. a loaded workflow.
    ///
    /// Custom fonts of the document keep their records but have to be
    /// loaded again before they measure text.
    pub fn with_state(state: DesignState) -> Self {
        let settings = EditorSettings::default();
        Self {
            history: History::with_limit(state, settings.history_limit),
            fonts: FontLibrary::new(),
            settings,
        }
    }

    /// The present document state
    pub fn state(&self) -> &DesignState {
        self.history.present()
    }

    /// Shared handle to the present state
    pub fn snapshot(&self) -> Arc<DesignState> {
        self.history.snapshot()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Fonts available for measurement
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Replace the whole document, dropping history
    pub fn load_state(&mut self, state: DesignState) {
        self.history = History::with_limit(state, self.settings.history_limit);
    }

    /// Execute a command.
    ///
    /// Returns whether the state changed. Invariant violations are no-ops;
    /// other errors propagate.
    pub fn execute(&mut self, command: &dyn Command) -> Result<bool> {
        let next = match command.apply(self.history.present()) {
            Ok(next) => next,
            Err(e) if e.is_noop() => {
                tracing::debug!(command = command.display_name(), error = %e, "command skipped");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        if command.records_history() {
            self.history.push(next);
        } else {
            self.history.replace_present(next);
        }
        tracing::trace!(command = command.display_name(), "command applied");
        Ok(true)
    }

    /// Apply a command that refreshes derived data, such as measured text
    /// heights, folding the result into the present state without an undo step
    pub fn execute_derived(&mut self, command: &dyn Command) -> Result<bool> {
        match command.apply(self.history.present()) {
            Ok(next) => {
                self.history.replace_present(next);
                Ok(true)
            }
            Err(e) if e.is_noop() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Execute a command whose failures can only be no-ops
    fn run(&mut self, command: &dyn Command) -> bool {
        match self.execute(command) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(command = command.display_name(), error = %e, "command failed");
                false
            }
        }
    }

    /// Undo the last command; no-op when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        self.history.undo().is_ok()
    }

    /// Redo the last undone command; no-op when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        self.history.redo().is_ok()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Elements
    // ------------------------------------------------------------------

    /// Add an element with pixel geometry; returns its id
    pub fn add_element(&mut self, draft: ElementDraft) -> Option<ElementId> {
        self.run(&AddElement::new(draft))
            .then(|| self.state().selected_element_ids.first().cloned())
            .flatten()
    }

    /// Add elements with mm geometry; returns their ids
    pub fn add_elements(&mut self, drafts: Vec<ElementDraft>) -> Vec<ElementId> {
        if drafts.is_empty() || !self.run(&AddElements::new(drafts)) {
            return Vec::new();
        }
        self.state().selected_element_ids.clone()
    }

    pub fn update_element(&mut self, element_id: &ElementId, patch: ElementPatch) -> bool {
        self.run(&UpdateElement::new(element_id.clone(), patch))
    }

    pub fn update_elements(&mut self, element_ids: &[ElementId], patch: ElementPatch) -> bool {
        self.run(&UpdateElements { element_ids: element_ids.to_vec(), patch })
    }

    pub fn delete_element(&mut self, element_id: &ElementId) -> bool {
        self.run(&DeleteElements::single(element_id.clone()))
    }

    pub fn delete_elements(&mut self, element_ids: &[ElementId]) -> bool {
        self.run(&DeleteElements::new(element_ids.to_vec()))
    }

    /// Duplicate an element; returns the id of the copy
    pub fn duplicate_element(&mut self, element_id: &ElementId) -> Option<ElementId> {
        self.run(&DuplicateElement::new(element_id.clone()))
            .then(|| self.state().selected_element_ids.first().cloned())
            .flatten()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select one element, or toggle it with `multi`; `None` clears
    pub fn select_element(&mut self, element_id: Option<&ElementId>, multi: bool) {
        self.run(&SelectElement { element_id: element_id.cloned(), multi });
    }

    pub fn select_elements(&mut self, element_ids: &[ElementId]) {
        self.run(&SelectElements { element_ids: element_ids.to_vec() });
    }

    pub fn clear_selection(&mut self) {
        self.run(&ClearSelection);
    }

    // ------------------------------------------------------------------
    // Stacking order
    // ------------------------------------------------------------------

    pub fn bring_to_front(&mut self, element_id: &ElementId) -> bool {
        self.run(&ChangeZOrder::new(element_id.clone(), ZOrderChange::BringToFront))
    }

    pub fn send_to_back(&mut self, element_id: &ElementId) -> bool {
        self.run(&ChangeZOrder::new(element_id.clone(), ZOrderChange::SendToBack))
    }

    pub fn bring_forward(&mut self, element_id: &ElementId) -> bool {
        self.run(&ChangeZOrder::new(element_id.clone(), ZOrderChange::BringForward))
    }

    pub fn send_backward(&mut self, element_id: &ElementId) -> bool {
        self.run(&ChangeZOrder::new(element_id.clone(), ZOrderChange::SendBackward))
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Copy the given elements, or the selection when `element_ids` is empty
    pub fn copy_elements(&mut self, element_ids: &[ElementId]) {
        let element_ids = if element_ids.is_empty() {
            self.state().selected_element_ids.clone()
        } else {
            element_ids.to_vec()
        };
        self.run(&CopyElements { element_ids });
    }

    /// Paste the clipboard; returns the ids of the pasted elements
    pub fn paste_elements(&mut self) -> Vec<ElementId> {
        if self.run(&PasteElements) {
            self.state().selected_element_ids.clone()
        } else {
            Vec::new()
        }
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    pub fn set_zoom(&mut self, percent: f64) {
        self.run(&SetZoom::to(percent));
    }

    pub fn zoom_in(&mut self) {
        self.run(&SetZoom { change: ZoomChange::In });
    }

    pub fn zoom_out(&mut self) {
        self.run(&SetZoom { change: ZoomChange::Out });
    }

    pub fn toggle_grid(&mut self) {
        self.run(&ToggleView { toggle: ViewToggle::Grid });
    }

    pub fn toggle_rulers(&mut self) {
        self.run(&ToggleView { toggle: ViewToggle::Rulers });
    }

    pub fn set_grid_size(&mut self, size: f64) -> bool {
        self.run(&SetGridSize { size })
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    pub fn update_page_settings(&mut self, page_id: &PageId, patch: PageSettingsPatch) -> bool {
        self.run(&UpdatePageSettings::new(page_id.clone(), patch))
    }

    /// Append an A4 page, make it current and return its id
    pub fn add_page(&mut self) -> PageId {
        self.run(&AddPage::default());
        self.state().current_page_id.clone()
    }

    pub fn delete_page(&mut self, page_id: &PageId) -> bool {
        self.run(&DeletePage::new(page_id.clone()))
    }

    pub fn set_current_page(&mut self, page_id: &PageId) -> bool {
        self.run(&SetCurrentPage::new(page_id.clone()))
    }

    // ------------------------------------------------------------------
    // Fonts
    // ------------------------------------------------------------------

    /// Load, validate and register a custom font.
    ///
    /// The font is recorded only after its data parsed; on failure the
    /// document is unchanged and the error is returned.
    pub async fn add_custom_font(&mut self, source: FontSource) -> Result<FontId> {
        if self.fonts.contains(&source.family) {
            return Err(EditError::FontLoad {
                family: source.family,
                reason: "a font with this family is already registered".into(),
            });
        }

        let loaded = load_font(&source).await?;
        let id = loaded.font.id.clone();
        let command = RegisterFont { font: loaded.font };
        let next = command.apply(self.state())?;
        self.history.replace_present(next);
        self.fonts.insert(&source.family, loaded.shaped);
        tracing::info!(family = %source.family, id = %id, "custom font registered");
        Ok(id)
    }

    pub fn remove_custom_font(&mut self, font_id: &FontId) -> bool {
        let family = self.state().font(font_id).map(|f| f.family.clone());
        let removed = self.run(&RemoveCustomFont { font_id: font_id.clone() });
        if let (true, Some(family)) = (removed, family) {
            self.fonts.remove(&family);
        }
        removed
    }

    // ------------------------------------------------------------------
    // Generated layouts
    // ------------------------------------------------------------------

    /// Parse a generated layout and merge it into the current page.
    ///
    /// Elements are added in one undo step; a page background override is
    /// applied as a second one.
    pub fn import_generated_layout(&mut self, response: &str) -> Result<Vec<ElementId>> {
        let layout = parse_generated_layout(response)?;
        let ids = self.add_elements(layout.elements);
        if let Some(patch) = layout.page_settings {
            let page_id = self.state().current_page_id.clone();
            self.update_page_settings(&page_id, patch);
        }
        tracing::debug!(count = ids.len(), "generated layout imported");
        Ok(ids)
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::ElementType;

    fn shape_session(n: usize) -> (EditSession, Vec<ElementId>) {
        let mut session = EditSession::new();
        let ids = session.add_elements(vec![ElementDraft::new(ElementType::Shape); n]);
        (session, ids)
    }

    #[test]
    fn test_undo_restores_exact_snapshot() {
        let (mut session, ids) = shape_session(2);
        let before = session.state().clone();

        assert!(session.update_element(&ids[0], ElementPatch::position(99.0, 1.0)));
        let after = session.state().clone();

        assert!(session.undo());
        assert_eq!(session.state(), &before);
        assert!(session.redo());
        assert_eq!(session.state(), &after);
    }

    #[test]
    fn test_new_command_after_undo_clears_redo() {
        let (mut session, ids) = shape_session(1);
        session.update_element(&ids[0], ElementPatch::rotation(10.0));
        session.undo();
        session.update_element(&ids[0], ElementPatch::rotation(20.0));

        assert!(!session.can_redo());
        assert!(!session.redo());
        assert_eq!(session.state().element(&ids[0]).unwrap().rotation, 20.0);
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut session = EditSession::new();
        let before = session.state().clone();
        assert!(!session.undo());
        assert!(!session.redo());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_every_update_is_its_own_step() {
        let (mut session, ids) = shape_session(1);
        for i in 0..3 {
            session.update_element(&ids[0], ElementPatch::rotation(i as f64));
        }
        // add + three updates
        let mut steps = 0;
        while session.undo() {
            steps += 1;
        }
        assert_eq!(steps, 4);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let (mut session, _) = shape_session(1);
        let before = session.state().clone();
        let ghost = ElementId::from("ghost");

        assert!(!session.update_element(&ghost, ElementPatch::rotation(5.0)));
        assert!(!session.delete_element(&ghost));
        assert!(!session.bring_to_front(&ghost));
        assert!(session.duplicate_element(&ghost).is_none());
        assert!(!session.set_current_page(&PageId::from("nope")));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_selection_does_not_create_undo_steps() {
        let (mut session, ids) = shape_session(2);
        session.clear_selection();
        session.select_element(Some(&ids[0]), false);
        session.select_element(Some(&ids[1]), true);
        session.zoom_in();
        session.toggle_grid();
        assert_eq!(session.state().selected_element_ids, ids);

        assert!(session.undo());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_page_lifecycle() {
        let mut session = EditSession::new();
        let first = session.state().current_page_id.clone();
        let second = session.add_page();
        assert_ne!(first, second);
        assert_eq!(session.state().current_page_id, second);

        assert!(session.delete_page(&second));
        assert_eq!(session.state().current_page_id, first);
        assert!(!session.delete_page(&first));
        assert_eq!(session.state().pages.len(), 1);
    }

    #[test]
    fn test_copy_selection_and_paste() {
        let (mut session, ids) = shape_session(2);
        session.copy_elements(&[]);
        assert_eq!(session.state().clipboard.len(), 2);

        let pasted = session.paste_elements();
        assert_eq!(pasted.len(), 2);
        assert!(pasted.iter().all(|id| !ids.contains(id)));
        assert_eq!(session.state().selected_element_ids, pasted);
    }

    #[test]
    fn test_history_limit_from_settings() {
        let settings = EditorSettings { history_limit: Some(1), ..Default::default() };
        let mut session = EditSession::with_settings(settings);
        session.add_element(ElementDraft::new(ElementType::Shape));
        session.add_element(ElementDraft::new(ElementType::Shape));
        assert!(session.undo());
        assert!(!session.undo());
    }

    #[test]
    fn test_import_generated_layout() {
        let mut session = EditSession::new();
        let response = r##"```json
{"elements": [{"type": "text", "x": 20, "y": 30, "content": "Title"}, {"type": "shape"}],
 "pageSettings": {"backgroundColor": "#fafafa"}}
```"##;
        let ids = session.import_generated_layout(response).unwrap();
        assert_eq!(ids.len(), 2);

        let title = session.state().element(&ids[0]).unwrap();
        assert_eq!((title.x, title.y), (20.0, 30.0));
        assert!(!session.state().pages[0].settings.background_color.is_white());

        assert!(session.import_generated_layout("garbage").is_err());
    }

    #[tokio::test]
    async fn test_failed_font_load_leaves_document_untouched() {
        let mut session = EditSession::new();
        let before = session.state().clone();
        let source = FontSource {
            name: "Broken".into(),
            family: "Broken".into(),
            url: "/no/such/font.ttf".into(),
            format: "truetype".into(),
        };
        assert!(session.add_custom_font(source).await.is_err());
        assert_eq!(session.state(), &before);
        assert!(session.fonts().is_empty());
    }
}
