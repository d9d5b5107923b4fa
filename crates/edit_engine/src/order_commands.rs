//! Stacking order commands

use crate::command::{current_page_mut, element_mut};
use crate::{Command, EditError, Result};
use doc_model::{DesignState, ElementId};
use serde::{Deserialize, Serialize};

/// How to move an element in the stacking order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZOrderChange {
    /// Above the current maximum
    BringToFront,
    /// To 0, renumbering everything else above it
    SendToBack,
    /// One step up
    BringForward,
    /// One step down, never below 0
    SendBackward,
}

/// Change one element's stacking order on the current page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeZOrder {
    pub element_id: ElementId,
    pub change: ZOrderChange,
}

impl ChangeZOrder {
    pub fn new(element_id: ElementId, change: ZOrderChange) -> Self {
        Self { element_id, change }
    }
}

impl Command for ChangeZOrder {
    fn apply(&self, state: &DesignState) -> Result<DesignState> {
        let mut next = state.clone();
        let page = current_page_mut(&mut next)?;

        match self.change {
            ZOrderChange::BringToFront => {
                let top = page.next_z_index();
                element_mut(page, &self.element_id)?.z_index = top;
            }
            ZOrderChange::BringForward => {
                element_mut(page, &self.element_id)?.z_index += 1;
            }
            ZOrderChange::SendBackward => {
                let element = element_mut(page, &self.element_id)?;
                if element.z_index <= 0 {
                    return Err(EditError::InvalidCommand(format!(
                        "element {} is already at the bottom",
                        self.element_id
                    )));
                }
                element.z_index -= 1;
            }
            ZOrderChange::SendToBack => {
                element_mut(page, &self.element_id)?.z_index = 0;

                // Rank the others by their previous order, ties by position
                let mut others: Vec<usize> = (0..page.elements.len())
                    .filter(|&i| page.elements[i].id != self.element_id)
                    .collect();
                others.sort_by_key(|&i| page.elements[i].z_index);
                for (rank, index) in others.into_iter().enumerate() {
                    page.elements[index].z_index = rank as i64 + 1;
                }
            }
        }
        Ok(next)
    }

    fn display_name(&self) -> &str {
        match self.change {
            ZOrderChange::BringToFront => "Bring to Front",
            ZOrderChange::SendToBack => "Send to Back",
            ZOrderChange::BringForward => "Bring Forward",
            ZOrderChange::SendBackward => "Send Backward",
        }
    }

    fn clone_box(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Element, ElementType, Page};
    use proptest::prelude::*;

    fn state_with_z(zs: &[i64]) -> (DesignState, Vec<ElementId>) {
        let mut state = DesignState::default();
        let page = state.current_page_mut().unwrap();
        for &z in zs {
            let mut el = Element::new(ElementType::Shape, 0.0, 0.0, 10.0, 10.0);
            el.z_index = z;
            page.elements.push(el);
        }
        let ids = page.elements.iter().map(|e| e.id.clone()).collect();
        (state, ids)
    }

    fn zs(state: &DesignState) -> Vec<i64> {
        state.current_page().unwrap().elements.iter().map(|e| e.z_index).collect()
    }

    fn run(state: &DesignState, id: &ElementId, change: ZOrderChange) -> Result<DesignState> {
        ChangeZOrder::new(id.clone(), change).apply(state)
    }

    #[test]
    fn test_bring_to_front() {
        let (state, ids) = state_with_z(&[1, 5, 3]);
        let next = run(&state, &ids[0], ZOrderChange::BringToFront).unwrap();
        assert_eq!(zs(&next), vec![6, 5, 3]);
    }

    #[test]
    fn test_send_to_back_renumbers_by_previous_rank() {
        let (state, ids) = state_with_z(&[4, 2, 9, 1]);
        let next = run(&state, &ids[2], ZOrderChange::SendToBack).unwrap();
        assert_eq!(zs(&next), vec![3, 2, 0, 1]);
    }

    #[test]
    fn test_forward_and_backward() {
        let (state, ids) = state_with_z(&[1, 0]);
        let next = run(&state, &ids[0], ZOrderChange::BringForward).unwrap();
        assert_eq!(zs(&next), vec![2, 0]);

        let next = run(&next, &ids[0], ZOrderChange::SendBackward).unwrap();
        assert_eq!(zs(&next), vec![1, 0]);

        assert!(run(&next, &ids[1], ZOrderChange::SendBackward).unwrap_err().is_noop());
    }

    #[test]
    fn test_missing_element() {
        let (state, _) = state_with_z(&[1]);
        let err = run(&state, &ElementId::from("ghost"), ZOrderChange::BringToFront).unwrap_err();
        assert!(matches!(err, EditError::ElementNotFound(_)));
    }

    proptest! {
        #[test]
        fn prop_send_to_back_ranks(zs_in in proptest::collection::vec(0i64..20, 1..12), pick in 0usize..12) {
            let (state, ids) = state_with_z(&zs_in);
            let target = &ids[pick % ids.len()];
            let next = run(&state, target, ZOrderChange::SendToBack).unwrap();
            let page: &Page = next.current_page().unwrap();

            prop_assert_eq!(page.element(target).unwrap().z_index, 0);

            // Others keep their relative order and occupy 1..=n-1
            let before = state.current_page().unwrap();
            let mut others: Vec<&ElementId> = ids.iter().filter(|id| *id != target).collect();
            others.sort_by_key(|id| before.element(id).unwrap().z_index);
            for (rank, id) in others.iter().enumerate() {
                prop_assert_eq!(page.element(id).unwrap().z_index, rank as i64 + 1);
            }
        }

        #[test]
        fn prop_bring_to_front_is_strict_max(zs_in in proptest::collection::vec(0i64..20, 1..12), pick in 0usize..12) {
            let (state, ids) = state_with_z(&zs_in);
            let target = &ids[pick % ids.len()];
            let next = run(&state, target, ZOrderChange::BringToFront).unwrap();
            let page = next.current_page().unwrap();
            let top = page.element(target).unwrap().z_index;
            for el in page.elements.iter().filter(|e| &e.id != target) {
                prop_assert!(top > el.z_index);
            }
        }
    }
}
