//! Linear undo/redo history of whole-state snapshots
//!
//! Snapshots are shared through `Arc`, so keeping a long history costs one
//! pointer per entry on top of the states themselves, and readers holding an
//! older snapshot are never affected by later edits.

use crate::{EditError, Result};
use doc_model::DesignState;
use std::sync::Arc;

/// `past`, `present` and `future` of the document
#[derive(Debug, Clone)]
pub struct History {
    /// Oldest first
    past: Vec<Arc<DesignState>>,
    present: Arc<DesignState>,
    /// Next redo last
    future: Vec<Arc<DesignState>>,
    /// Maximum number of undo entries; `None` keeps everything
    limit: Option<usize>,
}

impl History {
    pub fn new(initial: DesignState) -> Self {
        Self {
            past: Vec::new(),
            present: Arc::new(initial),
            future: Vec::new(),
            limit: None,
        }
    }

    /// Create with a cap on the number of undo entries
    pub fn with_limit(initial: DesignState, limit: Option<usize>) -> Self {
        Self { limit, ..Self::new(initial) }
    }

    pub fn present(&self) -> &DesignState {
        &self.present
    }

    /// Shared handle to the present snapshot
    pub fn snapshot(&self) -> Arc<DesignState> {
        Arc::clone(&self.present)
    }

    /// Make `next` the present state as a new undo step.
    ///
    /// Clears the redo stack.
    pub fn push(&mut self, next: DesignState) {
        let previous = std::mem::replace(&mut self.present, Arc::new(next));
        self.past.push(previous);
        self.future.clear();

        if let Some(limit) = self.limit {
            let excess = self.past.len().saturating_sub(limit);
            if excess > 0 {
                self.past.drain(..excess);
            }
        }
    }

    /// Replace the present state without creating an undo step
    pub fn replace_present(&mut self, next: DesignState) {
        self.present = Arc::new(next);
    }

    /// Step back to the previous snapshot
    pub fn undo(&mut self) -> Result<()> {
        let previous = self.past.pop().ok_or(EditError::UndoStackEmpty)?;
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        Ok(())
    }

    /// Step forward to the next snapshot
    pub fn redo(&mut self) -> Result<()> {
        let next = self.future.pop().ok_or(EditError::RedoStackEmpty)?;
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        Ok(())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Drop all undo/redo history, keeping the present state
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DesignState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_grid(size: f64) -> DesignState {
        DesignState { grid_size: size, ..Default::default() }
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new(state_with_grid(1.0));
        history.push(state_with_grid(2.0));

        history.undo().unwrap();
        assert_eq!(history.present().grid_size, 1.0);
        history.redo().unwrap();
        assert_eq!(history.present().grid_size, 2.0);
    }

    #[test]
    fn test_new_push_clears_future() {
        let mut history = History::new(state_with_grid(1.0));
        history.push(state_with_grid(2.0));
        history.undo().unwrap();
        history.push(state_with_grid(3.0));

        assert!(!history.can_redo());
        assert!(matches!(history.redo(), Err(EditError::RedoStackEmpty)));
    }

    #[test]
    fn test_empty_stacks() {
        let mut history = History::default();
        assert!(matches!(history.undo(), Err(EditError::UndoStackEmpty)));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_replace_present_keeps_stacks() {
        let mut history = History::new(state_with_grid(1.0));
        history.push(state_with_grid(2.0));
        history.replace_present(state_with_grid(5.0));
        assert_eq!(history.undo_depth(), 1);
        history.undo().unwrap();
        assert_eq!(history.present().grid_size, 1.0);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(state_with_grid(0.0), Some(2));
        for i in 1..=4 {
            history.push(state_with_grid(i as f64));
        }
        assert_eq!(history.undo_depth(), 2);
        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(history.present().grid_size, 2.0);
        assert!(!history.can_undo());
    }
}
