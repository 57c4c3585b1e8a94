//! Drag-and-drop reconciliation.
//!
//! A drag carries a [`StreamId`], not a slot position, because the stream is
//! what the uniqueness invariant is keyed on.  On drop, [`reconcile`] turns
//! `(origin, target)` into a short list of primitive [`GridOp`]s:
//!
//! | origin        | target slot          | ops                         |
//! |---------------|----------------------|-----------------------------|
//! | same as target| —                    | none                        |
//! | `Some(src)`   | holds another stream | `Swap(src, target)`         |
//! | `Some(src)`   | empty                | `Assign { stream, target }` |
//! | `None`        | anything             | `Assign { stream, target }` |
//!
//! The first row is a no-op, the second a true swap (the displaced stream
//! lands on the drag's origin), the third a move that leaves the origin
//! empty.  `None` is a stream dragged in from the catalog picker; it
//! replaces whatever the target showed.
//!
//! [`reconcile`] is pure and needs no grid, so it can be tested without any
//! rendering surface.  [`SlotGrid::drop_stream`] is the stateful wrapper.

use crate::grid::{GridError, SlotGrid, StreamId};
use serde::{Deserialize, Serialize};

/// A primitive grid mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridOp {
    Assign { stream: StreamId, position: usize },
    Swap(usize, usize),
}

/// Plan the grid calls for dropping `stream`, currently at `origin`, onto
/// `target`.
pub fn reconcile(
    stream: &StreamId,
    origin: Option<usize>,
    target: usize,
    target_occupied: bool,
) -> Vec<GridOp> {
    match origin {
        Some(src) if src == target => Vec::new(),
        Some(src) if target_occupied => vec![GridOp::Swap(src, target)],
        _ => vec![GridOp::Assign {
            stream: stream.clone(),
            position: target,
        }],
    }
}

impl SlotGrid {
    /// Run one primitive operation.
    pub fn apply(&mut self, op: &GridOp) -> Result<(), GridError> {
        match op {
            GridOp::Assign { stream, position } => {
                self.assign(stream.clone(), *position)?;
            }
            GridOp::Swap(a, b) => self.swap(*a, *b)?,
        }
        Ok(())
    }

    /// Plan a drop of `stream` onto `target` against the current state.
    pub fn plan_drop(&self, stream: &StreamId, target: usize) -> Result<Vec<GridOp>, GridError> {
        self.check(target)?;
        let origin = self.position_of(stream);
        let occupied = self.slots()[target].stream().is_some_and(|s| s != stream);
        Ok(reconcile(stream, origin, target, occupied))
    }

    /// Drop `stream` onto `target` and return the operations that were
    /// applied.
    ///
    /// The target is validated before anything changes.  The planned
    /// operations only reference the target and the stream's current slot,
    /// so once planning succeeds every step succeeds.
    pub fn drop_stream(&mut self, stream: &StreamId, target: usize) -> Result<Vec<GridOp>, GridError> {
        let ops = self.plan_drop(stream, target)?;
        for op in &ops {
            self.apply(op)?;
        }
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    fn id(s: &str) -> StreamId {
        StreamId::from(s)
    }

    fn grid(streams: &[&str]) -> SlotGrid {
        SlotGrid::new(Layout::TwoByTwo, streams.iter().map(|s| id(s)))
    }

    #[test]
    fn reconcile_same_position_is_empty() {
        assert!(reconcile(&id("a"), Some(2), 2, true).is_empty());
    }

    #[test]
    fn reconcile_occupied_target_swaps() {
        assert_eq!(reconcile(&id("a"), Some(0), 3, true), vec![GridOp::Swap(0, 3)]);
    }

    #[test]
    fn reconcile_empty_target_moves() {
        assert_eq!(
            reconcile(&id("a"), Some(0), 3, false),
            vec![GridOp::Assign { stream: id("a"), position: 3 }]
        );
    }

    #[test]
    fn reconcile_from_catalog_assigns() {
        assert_eq!(
            reconcile(&id("new"), None, 1, true),
            vec![GridOp::Assign { stream: id("new"), position: 1 }]
        );
    }

    #[test]
    fn drop_onto_occupied_slot_swaps_streams() {
        let mut g = grid(&["a", "b", "c"]);
        g.toggle_mute(2).unwrap();
        let ops = g.drop_stream(&id("a"), 2).unwrap();
        assert_eq!(ops, vec![GridOp::Swap(0, 2)]);
        assert_eq!(g.position_of(&id("a")), Some(2));
        assert_eq!(g.position_of(&id("c")), Some(0), "displaced stream goes to origin");
        assert!(g.slot(2).unwrap().is_muted(), "mute stays with the position");
    }

    #[test]
    fn drop_onto_empty_slot_moves_stream() {
        let mut g = grid(&["a", "b"]);
        g.drop_stream(&id("a"), 3).unwrap();
        assert!(g.slot(0).unwrap().is_empty());
        assert_eq!(g.position_of(&id("a")), Some(3));
        assert_eq!(g.position_of(&id("b")), Some(1));
    }

    #[test]
    fn drop_onto_own_slot_is_noop() {
        let mut g = grid(&["a", "b"]);
        let before = g.clone();
        assert!(g.drop_stream(&id("b"), 1).unwrap().is_empty());
        assert_eq!(g, before);
    }

    #[test]
    fn drop_from_catalog_replaces_target() {
        let mut g = grid(&["a", "b"]);
        g.drop_stream(&id("z"), 1).unwrap();
        assert_eq!(g.position_of(&id("z")), Some(1));
        assert_eq!(g.position_of(&id("b")), None);
    }

    #[test]
    fn drop_out_of_range_leaves_grid_unchanged() {
        let mut g = grid(&["a"]);
        let before = g.clone();
        assert!(matches!(
            g.drop_stream(&id("a"), 7),
            Err(GridError::InvalidPosition { position: 7, max_slots: 4 })
        ));
        assert_eq!(g, before);
    }

    #[test]
    fn apply_runs_primitive_ops() {
        let mut g = grid(&["a", "b"]);
        g.apply(&GridOp::Swap(0, 1)).unwrap();
        g.apply(&GridOp::Assign { stream: id("c"), position: 2 }).unwrap();
        let shown: Vec<_> = g.assigned().map(|(p, s)| (p, s.as_str())).collect();
        assert_eq!(shown, vec![(0, "b"), (1, "a"), (2, "c")]);
    }
}
