//! Inline text editing

use doc_model::ElementId;

/// Keys with a meaning while a text box is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter { shift: bool },
    Escape,
}

/// What a key press does to the edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The key is ordinary input for the text box
    Continue,
    /// Leave editing; the last written content stands
    Exit,
}

/// An open in-place editor bound to one text element's content.
///
/// Every change is written straight to the document, so leaving the editor
/// never needs to write anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditSession {
    element_id: ElementId,
    changes: usize,
}

impl TextEditSession {
    pub fn new(element_id: ElementId) -> Self {
        Self { element_id, changes: 0 }
    }

    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    /// Number of content changes written in this session
    pub fn changes(&self) -> usize {
        self.changes
    }

    pub(crate) fn record_change(&mut self) {
        self.changes += 1;
    }

    /// Shift+Enter inserts a line break; plain Enter and Escape both leave
    pub fn key(&self, key: EditKey) -> EditOutcome {
        match key {
            EditKey::Enter { shift: true } => EditOutcome::Continue,
            EditKey::Enter { shift: false } | EditKey::Escape => EditOutcome::Exit,
        }
    }
}
