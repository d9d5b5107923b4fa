//! Interaction engine: pointer and key events in, document edits out

use crate::{
    measured_height_mm, DragGesture, EditKey, EditOutcome, Frame, GestureState, ResizeGesture,
    Result, RotateGesture, TextEditSession, TextHeights,
};
use doc_model::{DesignState, ElementId, ElementPatch, FontId};
use edit_engine::{EditSession, FontSource, UpdateElement};
use render_model::{hit_handle, project_current_page, HandleHit, Point, Projector, ResizeHandle};

/// What a pointer-down landed on
#[derive(Debug, Clone, PartialEq)]
pub enum PointerTarget {
    /// Empty canvas
    Background,
    /// Body of an element
    Element(ElementId),
    /// A handle of a selected element
    Handle(ElementId, HandleHit),
}

/// Drives an [`EditSession`] from canvas events
pub struct InteractionEngine {
    session: EditSession,
    gesture: GestureState,
    editing: Option<TextEditSession>,
    text_heights: TextHeights,
}

impl InteractionEngine {
    pub fn new(session: EditSession) -> Self {
        Self {
            session,
            gesture: GestureState::Idle,
            editing: None,
            text_heights: TextHeights::new(),
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn state(&self) -> &DesignState {
        self.session.state()
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Element whose text is being edited in place
    pub fn editing(&self) -> Option<&ElementId> {
        self.editing.as_ref().map(TextEditSession::element_id)
    }

    /// Run edits against the session, then refresh derived text heights
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut EditSession) -> R) -> Result<R> {
        let out = f(&mut self.session);
        self.refresh_text_heights()?;
        Ok(out)
    }

    /// Register a custom font and re-measure text that may use it
    pub async fn add_custom_font(&mut self, source: FontSource) -> Result<FontId> {
        let id = self.session.add_custom_font(source).await?;
        self.text_heights.invalidate();
        self.refresh_text_heights()?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Resolve a page-relative point: handles of selected elements first,
    /// then the topmost element, then the background
    pub fn hit_test(&self, p: Point) -> Result<PointerTarget> {
        let view = project_current_page(self.state())?;
        let handle = view
            .elements
            .iter()
            .rev()
            .filter(|b| b.selected)
            .find_map(|b| hit_handle(b, p).map(|hit| PointerTarget::Handle(b.element_id.clone(), hit)));
        if let Some(target) = handle {
            return Ok(target);
        }
        Ok(view
            .element_at(p)
            .map(|b| PointerTarget::Element(b.element_id.clone()))
            .unwrap_or(PointerTarget::Background))
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    /// Pointer-down on a target. Starting a gesture replaces any gesture
    /// still active.
    pub fn pointer_down(&mut self, target: PointerTarget, p: Point, multi: bool) -> Result<()> {
        self.gesture = GestureState::Idle;
        match target {
            PointerTarget::Background => self.click_background(),
            PointerTarget::Element(id) => {
                let Some(el) = self.state().element(&id) else {
                    return Ok(());
                };
                let (initial_x, initial_y) = (el.x, el.y);
                self.session.select_element(Some(&id), multi);
                self.begin(GestureState::Dragging(DragGesture {
                    element_id: id,
                    start: p,
                    initial_x,
                    initial_y,
                }));
            }
            PointerTarget::Handle(id, HandleHit::Resize(handle)) => self.begin_resize(id, handle, p),
            PointerTarget::Handle(id, HandleHit::Rotate) => self.begin_rotate(id, p),
        }
        Ok(())
    }

    fn begin(&mut self, gesture: GestureState) {
        tracing::trace!(gesture = gesture.name(), "gesture started");
        self.gesture = gesture;
    }

    fn begin_resize(&mut self, id: ElementId, handle: ResizeHandle, p: Point) {
        let Some(el) = self.state().element(&id) else {
            return;
        };
        if !ResizeHandle::for_type(el.element_type).contains(&handle) {
            return;
        }
        let initial = Frame::of(el);
        self.begin(GestureState::Resizing(ResizeGesture {
            element_id: id,
            handle,
            start: p,
            initial,
        }));
    }

    fn begin_rotate(&mut self, id: ElementId, p: Point) {
        let Some(el) = self.state().element(&id) else {
            return;
        };
        let center = Projector::new(self.state().zoom).project(el).center();
        let gesture = RotateGesture {
            element_id: id,
            center,
            start_angle: p.angle_from(center),
            initial_rotation: el.rotation,
        };
        self.begin(GestureState::Rotating(gesture));
    }

    /// Pointer-move: update the gesture's element. Returns whether the
    /// document changed.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        let zoom = self.state().zoom;
        let (id, patch) = match &self.gesture {
            GestureState::Idle => return false,
            GestureState::Dragging(g) => {
                let (x, y) = g.position_at(p, zoom);
                (g.element_id.clone(), ElementPatch::position(x, y))
            }
            GestureState::Resizing(g) => {
                let Some(el) = self.session.state().element(&g.element_id) else {
                    return false;
                };
                let mut frame = g.frame_at(p, zoom, el.rotation, el.is_text());
                if el.is_text() {
                    frame.height = measured_height_mm(el, frame.width, zoom, self.session.fonts());
                }
                (
                    g.element_id.clone(),
                    ElementPatch::frame(frame.x, frame.y, frame.width, frame.height),
                )
            }
            GestureState::Rotating(g) => (g.element_id.clone(), ElementPatch::rotation(g.rotation_at(p))),
        };
        self.session.update_element(&id, patch)
    }

    /// Pointer-up from any gesture returns to idle
    pub fn pointer_up(&mut self) -> Result<()> {
        let was_resizing = self.gesture.resizing().is_some();
        self.gesture = GestureState::Idle;
        if was_resizing {
            self.refresh_text_heights()?;
        }
        Ok(())
    }

    /// Click on the empty canvas: clear the selection and stop editing
    pub fn click_background(&mut self) {
        self.session.clear_selection();
        self.editing = None;
    }

    // ------------------------------------------------------------------
    // Text editing
    // ------------------------------------------------------------------

    /// Double-click on an element; only text elements open an editor
    pub fn double_click(&mut self, id: &ElementId) -> bool {
        let is_text = self.state().element(id).is_some_and(|el| el.is_text());
        if is_text {
            self.gesture = GestureState::Idle;
            self.editing = Some(TextEditSession::new(id.clone()));
        }
        is_text
    }

    /// The editor's content changed; written through as one undo step
    pub fn text_input(&mut self, content: &str) -> Result<bool> {
        let Some(id) = self.editing().cloned() else {
            return Ok(false);
        };
        if !self.session.update_element(&id, ElementPatch::content(content)) {
            // The element went away underneath the editor
            self.editing = None;
            return Ok(false);
        }
        if let Some(editor) = self.editing.as_mut() {
            editor.record_change();
        }
        self.refresh_text_heights()?;
        Ok(true)
    }

    /// Key press in the editor. Returns whether editing ended.
    pub fn key(&mut self, key: EditKey) -> bool {
        match self.editing.as_ref().map(|e| e.key(key)) {
            Some(EditOutcome::Exit) => {
                self.end_editing();
                true
            }
            _ => false,
        }
    }

    /// The editor lost focus
    pub fn blur(&mut self) {
        self.end_editing();
    }

    fn end_editing(&mut self) {
        if let Some(editor) = self.editing.take() {
            tracing::debug!(element = %editor.element_id(), changes = editor.changes(), "text edit closed");
        }
    }

    // ------------------------------------------------------------------
    // Autosize
    // ------------------------------------------------------------------

    /// Bring the height of text elements on the current page in line with
    /// their content. Only elements whose width, content, text styles or
    /// height changed since the last pass are measured, all of them after a
    /// zoom change. Elements under an active resize are left alone.
    ///
    /// Heights are derived data, so corrections do not create undo steps.
    pub fn refresh_text_heights(&mut self) -> Result<usize> {
        let state = self.session.state();
        let Some(page) = state.current_page() else {
            return Ok(0);
        };
        let (updates, measured) =
            self.text_heights
                .updates(page, state.zoom, self.session.fonts(), self.gesture.resizing());
        tracing::trace!(measured, "autosize pass");

        for (id, height) in &updates {
            self.session
                .execute_derived(&UpdateElement::new(id.clone(), ElementPatch::height(*height)))?;
        }
        if !updates.is_empty() {
            tracing::debug!(count = updates.len(), "text heights refreshed");
        }
        Ok(updates.len())
    }
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new(EditSession::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::min_text_width_mm;
    use doc_model::units::px_to_mm;
    use doc_model::{ElementDraft, ElementType};

    fn engine_with_shape(rotation: f64) -> (InteractionEngine, ElementId) {
        let mut engine = InteractionEngine::default();
        let draft = ElementDraft::new(ElementType::Shape)
            .at(50.0, 50.0)
            .sized(100.0, 100.0)
            .with_rotation(rotation);
        let ids = engine.edit(|s| s.add_elements(vec![draft])).unwrap();
        (engine, ids[0].clone())
    }

    fn engine_with_text(content: &str) -> (InteractionEngine, ElementId) {
        let mut engine = InteractionEngine::default();
        let id = engine
            .edit(|s| s.add_element(ElementDraft::new(ElementType::Text).with_content(content)))
            .unwrap()
            .unwrap();
        (engine, id)
    }

    fn resize(engine: &mut InteractionEngine, id: &ElementId, handle: ResizeHandle, dx: f64, dy: f64) {
        let start = Point::new(400.0, 400.0);
        engine
            .pointer_down(PointerTarget::Handle(id.clone(), HandleHit::Resize(handle)), start, false)
            .unwrap();
        assert!(engine.pointer_move(Point::new(start.x + dx, start.y + dy)));
        engine.pointer_up().unwrap();
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_se_resize_at_actual_size() {
        let (mut engine, id) = engine_with_shape(0.0);
        resize(&mut engine, &id, ResizeHandle::Se, 20.0, 10.0);

        let el = engine.state().element(&id).unwrap();
        assert!(close(el.width, 100.0 + px_to_mm(20.0)));
        assert!(close(el.height, 100.0 + px_to_mm(10.0)));
        assert_eq!((el.x, el.y), (50.0, 50.0));
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_east_resize_of_quarter_turned_shape() {
        let (mut engine, id) = engine_with_shape(90.0);
        resize(&mut engine, &id, ResizeHandle::E, 20.0, 0.0);

        // The screen delta lands on the local y axis, which `e` does not move
        let el = engine.state().element(&id).unwrap();
        assert!(close(el.width, 100.0));
        assert!(close(el.height, 100.0));
        assert!(close(el.x, 50.0) && close(el.y, 50.0));
    }

    #[test]
    fn test_drag_moves_in_screen_axes() {
        let (mut engine, id) = engine_with_shape(45.0);
        engine.edit(|s| s.set_zoom(200.0)).unwrap();

        engine
            .pointer_down(PointerTarget::Element(id.clone()), Point::new(0.0, 0.0), false)
            .unwrap();
        engine.pointer_move(Point::new(96.0, 0.0));
        engine.pointer_move(Point::new(192.0, -96.0));
        engine.pointer_up().unwrap();

        let el = engine.state().element(&id).unwrap();
        assert!(close(el.x, 50.0 + 25.4));
        assert!(close(el.y, 50.0 - 12.7));
        assert_eq!(engine.state().selected_element_ids, vec![id]);
    }

    #[test]
    fn test_rotate_about_projected_center() {
        let (mut engine, id) = engine_with_shape(0.0);
        let center = Projector::default().project(engine.state().element(&id).unwrap()).center();

        engine
            .pointer_down(
                PointerTarget::Handle(id.clone(), HandleHit::Rotate),
                Point::new(center.x + 50.0, center.y),
                false,
            )
            .unwrap();
        engine.pointer_move(Point::new(center.x, center.y + 50.0));
        assert!(close(engine.state().element(&id).unwrap().rotation, 90.0));
        engine.pointer_move(Point::new(center.x, center.y - 50.0));
        assert!(close(engine.state().element(&id).unwrap().rotation, 270.0));
    }

    #[test]
    fn test_move_without_gesture_does_nothing() {
        let (mut engine, _) = engine_with_shape(0.0);
        engine.pointer_up().unwrap();
        assert!(!engine.pointer_move(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_hit_test_prefers_handles_of_selection() {
        let (mut engine, id) = engine_with_shape(0.0);
        let b = Projector::default().project(engine.state().element(&id).unwrap());
        let corner = Point::new(b.rect.x + b.rect.width, b.rect.y + b.rect.height);

        engine.click_background();
        assert_eq!(engine.hit_test(corner).unwrap(), PointerTarget::Element(id.clone()));

        engine.edit(|s| s.select_element(Some(&id), false)).unwrap();
        assert_eq!(
            engine.hit_test(corner).unwrap(),
            PointerTarget::Handle(id, HandleHit::Resize(ResizeHandle::Se))
        );
        assert_eq!(engine.hit_test(Point::new(1.0, 1.0)).unwrap(), PointerTarget::Background);
    }

    #[test]
    fn test_new_text_gets_measured_height() {
        let (engine, id) = engine_with_text("Hello");
        let el = engine.state().element(&id).unwrap();
        let measured = measured_height_mm(el, el.width, engine.state().zoom, engine.session().fonts());
        assert!(close(el.height, measured));
    }

    #[test]
    fn test_autosize_does_not_add_undo_steps() {
        let (mut engine, _) = engine_with_text("Hello");
        engine.edit(|s| assert!(s.undo())).unwrap();
        assert!(!engine.session().can_undo());
        assert_eq!(engine.state().element_count(), 0);
    }

    #[test]
    fn test_text_editing_flow() {
        let (mut engine, id) = engine_with_text("Hi");
        let one_line = engine.state().element(&id).unwrap().height;

        assert!(engine.double_click(&id));
        assert_eq!(engine.editing(), Some(&id));
        let long = "word ".repeat(40);
        assert!(engine.text_input(&long).unwrap());

        let el = engine.state().element(&id).unwrap();
        assert_eq!(el.text(), long);
        assert!(el.height > one_line);

        assert!(!engine.key(EditKey::Enter { shift: true }));
        assert!(engine.key(EditKey::Enter { shift: false }));
        assert_eq!(engine.editing(), None);
        assert!(!engine.text_input("ignored").unwrap());
    }

    #[test]
    fn test_double_click_on_shape_does_not_edit() {
        let (mut engine, id) = engine_with_shape(0.0);
        assert!(!engine.double_click(&id));
        assert_eq!(engine.editing(), None);
    }

    #[test]
    fn test_background_click_clears_selection_and_editing() {
        let (mut engine, id) = engine_with_text("Hi");
        engine.double_click(&id);
        engine
            .pointer_down(PointerTarget::Background, Point::default(), false)
            .unwrap();
        assert!(engine.state().selected_element_ids.is_empty());
        assert_eq!(engine.editing(), None);
    }

    #[test]
    fn test_text_resize_owns_height_until_pointer_up() {
        let (mut engine, id) = engine_with_text(&"abc ".repeat(30));
        let before = engine.state().element(&id).unwrap().clone();

        let start = Point::new(0.0, 0.0);
        engine
            .pointer_down(PointerTarget::Handle(id.clone(), HandleHit::Resize(ResizeHandle::E)), start, false)
            .unwrap();
        engine.pointer_move(Point::new(-1000.0, 0.0));

        let narrowed = engine.state().element(&id).unwrap().clone();
        assert!(close(narrowed.width, min_text_width_mm()));
        assert!(narrowed.height > before.height);
        assert_eq!(engine.refresh_text_heights().unwrap(), 0);

        engine.pointer_up().unwrap();
        assert_eq!(engine.state().element(&id).unwrap().height, narrowed.height);
    }

    #[test]
    fn test_text_refuses_vertical_handles() {
        let (mut engine, id) = engine_with_text("Hi");
        engine
            .pointer_down(PointerTarget::Handle(id, HandleHit::Resize(ResizeHandle::N)), Point::default(), false)
            .unwrap();
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_typing_settles_only_the_edited_text() {
        let (mut engine, id) = engine_with_text("Hi");
        let other = engine
            .edit(|s| s.add_elements(vec![ElementDraft::new(ElementType::Text).with_content("Other")]))
            .unwrap()[0]
            .clone();
        let other_height = engine.state().element(&other).unwrap().height;
        assert_eq!(engine.refresh_text_heights().unwrap(), 0);

        engine.double_click(&id);
        engine.text_input(&"word ".repeat(40)).unwrap();
        assert_eq!(engine.refresh_text_heights().unwrap(), 0);
        assert_eq!(engine.state().element(&other).unwrap().height, other_height);
    }

    #[test]
    fn test_zoom_change_re_measures() {
        let (mut engine, id) = engine_with_text(&"abc ".repeat(30));
        let at_100 = engine.state().element(&id).unwrap().height;
        engine.edit(|s| s.set_zoom(400.0)).unwrap();
        assert!(engine.state().element(&id).unwrap().height < at_100);
    }
}
