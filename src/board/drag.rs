//! Drag-reorder coordinator.
//!
//! DESIGN
//! ======
//! One gesture at a time per board session. The coordinator holds only the
//! two ids a gesture needs (`dragged`, `drop_target`) and writes visual
//! markers through the controller so they render with the lists. Gesture
//! end turns the last recorded target into a single `move_before`.
//!
//! The recorded target outlives `leave`: moving the pointer off a list and
//! releasing in empty space still drops before the last list entered.

use serde::Deserialize;
use tracing::debug;

use super::controller::{BoardController, Effect};
use super::list::{DragMarkers, ListId};

/// Where the gesture started. Only list roots are draggable; rows inside a
/// list carry their own drag payload (links) and are ignored here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragOrigin {
    #[default]
    List,
    Issue,
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    dragged: Option<ListId>,
    drop_target: Option<ListId>,
}

impl DragCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dragged(&self) -> Option<ListId> {
        self.dragged
    }

    #[must_use]
    pub fn drop_target(&self) -> Option<ListId> {
        self.drop_target
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn start(&mut self, board: &mut BoardController, list_id: ListId, origin: DragOrigin) -> Vec<Effect> {
        if origin == DragOrigin::Issue {
            debug!(%list_id, "drag: start on issue row ignored");
            return Vec::new();
        }

        let mut effects = self.cancel(board);
        if board.list(list_id).is_none() {
            debug!(%list_id, "drag: start on unknown list ignored");
            return effects;
        }

        self.dragged = Some(list_id);
        effects.extend(board.set_markers(list_id, DragMarkers { dragged: true, dragover: false }));
        effects
    }

    /// Pointer entered a list. Ignored unless a gesture is active.
    pub fn enter(&mut self, board: &mut BoardController, list_id: ListId) -> Vec<Effect> {
        let Some(dragged) = self.dragged else {
            return Vec::new();
        };
        if board.list(list_id).is_none() {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if let Some(previous) = self.drop_target.filter(|&previous| previous != list_id) {
            effects.extend(self.clear_dragover(board, previous, dragged));
        }

        self.drop_target = Some(list_id);
        let markers = DragMarkers { dragged: list_id == dragged, dragover: true };
        effects.extend(board.set_markers(list_id, markers));
        effects
    }

    /// Pointer left a list: drop its marker, keep the recorded target.
    pub fn leave(&mut self, board: &mut BoardController, list_id: ListId) -> Vec<Effect> {
        let Some(dragged) = self.dragged else {
            return Vec::new();
        };
        self.clear_dragover(board, list_id, dragged).into_iter().collect()
    }

    /// Gesture finished. Clears every marker, then moves the dragged list
    /// before the recorded target if there is one.
    pub fn end(&mut self, board: &mut BoardController) -> Vec<Effect> {
        let dragged = self.dragged;
        let target = self.drop_target;
        let mut effects = self.cancel(board);

        match (dragged, target) {
            (Some(dragged), Some(target)) => {
                debug!(%dragged, %target, "drag: drop");
                effects.extend(board.move_before(dragged, target));
            }
            (Some(dragged), None) => debug!(%dragged, "drag: ended without target"),
            (None, _) => {}
        }
        effects
    }

    /// Abandon the gesture without reordering.
    pub fn cancel(&mut self, board: &mut BoardController) -> Vec<Effect> {
        self.dragged = None;
        self.drop_target = None;

        let ids: Vec<ListId> = board
            .lists()
            .iter()
            .filter(|list| list.markers() != DragMarkers::default())
            .map(|list| list.id())
            .collect();
        ids.into_iter()
            .filter_map(|id| board.set_markers(id, DragMarkers::default()))
            .collect()
    }

    fn clear_dragover(&self, board: &mut BoardController, list_id: ListId, dragged: ListId) -> Option<Effect> {
        board.set_markers(list_id, DragMarkers { dragged: list_id == dragged, dragover: false })
    }
}

#[cfg(test)]
#[path = "drag_test.rs"]
mod tests;
