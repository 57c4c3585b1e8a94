//! Property-based invariant tests for the slot grid.
//!
//! For arbitrary operation sequences:
//!
//! 1. A stream is shown in at most one slot.
//! 2. At most one slot is fullscreen, and it holds a stream.
//! 3. The slot list matches the layout: `len == max_slots`, `slots[i].position == i`.
//! 4. A failed operation leaves the grid unchanged.
//! 5. Resizing A → B → A keeps every slot below `min(max(A), max(B))`.
//! 6. Restoring a snapshot taken a moment ago reproduces layout and slots.
//! 7. A JSON file store round-trips snapshots losslessly.

use proptest::prelude::*;
use std::collections::HashSet;
use streamgrid::grid::{GridError, SlotGrid, StreamId};
use streamgrid::layout::Layout;
use streamgrid::snapshot::LayoutSnapshot;
use streamgrid::store::file::JsonFileStore;
use streamgrid::traits::LayoutStore;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Assign(usize, usize),
    Remove(usize),
    Swap(usize, usize),
    ToggleMute(usize),
    EnterFullscreen(usize),
    ToggleFullscreen(usize),
    ExitFullscreen,
    Resize(Layout),
    ClearAll,
    Drop(usize, usize),
}

/// Positions deliberately overshoot the largest grid so errors are hit.
fn position() -> impl Strategy<Value = usize> {
    0usize..20
}

/// A small pool of streams so collisions are frequent.
fn stream_index() -> impl Strategy<Value = usize> {
    0usize..8
}

fn layout() -> impl Strategy<Value = Layout> {
    prop::sample::select(Layout::ALL.to_vec())
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (stream_index(), position()).prop_map(|(s, p)| Op::Assign(s, p)),
        2 => position().prop_map(Op::Remove),
        3 => (position(), position()).prop_map(|(a, b)| Op::Swap(a, b)),
        1 => position().prop_map(Op::ToggleMute),
        2 => position().prop_map(Op::EnterFullscreen),
        1 => position().prop_map(Op::ToggleFullscreen),
        1 => Just(Op::ExitFullscreen),
        2 => layout().prop_map(Op::Resize),
        1 => Just(Op::ClearAll),
        3 => (stream_index(), position()).prop_map(|(s, p)| Op::Drop(s, p)),
    ]
}

fn ops(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op(), 0..=max_len)
}

fn stream(i: usize) -> StreamId {
    StreamId::new(format!("stream-{}", i))
}

fn run(grid: &mut SlotGrid, op: &Op) -> Result<(), GridError> {
    match op {
        Op::Assign(s, p) => grid.assign(stream(*s), *p).map(|_| ()),
        Op::Remove(p) => grid.remove(*p),
        Op::Swap(a, b) => grid.swap(*a, *b),
        Op::ToggleMute(p) => grid.toggle_mute(*p).map(|_| ()),
        Op::EnterFullscreen(p) => grid.enter_fullscreen(*p),
        Op::ToggleFullscreen(p) => grid.toggle_fullscreen(*p),
        Op::ExitFullscreen => {
            grid.exit_fullscreen();
            Ok(())
        }
        Op::Resize(l) => {
            grid.resize(*l);
            Ok(())
        }
        Op::ClearAll => {
            grid.clear_all();
            Ok(())
        }
        Op::Drop(s, p) => grid.drop_stream(&stream(*s), *p).map(|_| ()),
    }
}

fn check_invariants(grid: &SlotGrid) -> Result<(), TestCaseError> {
    let slots = grid.slots();
    prop_assert_eq!(slots.len(), grid.layout().max_slots());
    let mut seen = HashSet::new();
    for (i, slot) in slots.iter().enumerate() {
        prop_assert_eq!(slot.position(), i);
        if let Some(s) = slot.stream() {
            prop_assert!(seen.insert(s.clone()), "stream {} shown twice", s);
        }
    }
    let fullscreen: Vec<usize> = grid
        .view()
        .slots
        .iter()
        .filter(|v| v.is_fullscreen)
        .map(|v| v.position)
        .collect();
    prop_assert!(fullscreen.len() <= 1);
    if let Some(f) = grid.fullscreen() {
        prop_assert_eq!(fullscreen, vec![f]);
        prop_assert!(!slots[f].is_empty(), "fullscreen slot {} is empty", f);
    }
    Ok(())
}

fn initial_grid() -> impl Strategy<Value = SlotGrid> {
    (layout(), proptest::collection::vec(stream_index(), 0..20))
        .prop_map(|(l, ids)| SlotGrid::new(l, ids.into_iter().map(stream)))
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Structural invariants hold after every operation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_for_any_sequence(mut grid in initial_grid(), ops in ops(60)) {
        check_invariants(&grid)?;
        for op in &ops {
            let _ = run(&mut grid, op);
            check_invariants(&grid)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Failed operations are all-or-nothing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn failed_operations_change_nothing(mut grid in initial_grid(), ops in ops(60)) {
        for op in &ops {
            let before = grid.clone();
            if run(&mut grid, op).is_err() {
                prop_assert_eq!(&grid, &before, "op {:?} failed but mutated the grid", op);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Resize preservation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_round_trip_keeps_common_prefix(
        mut grid in initial_grid(),
        ops in ops(20),
        other in layout(),
    ) {
        for op in &ops {
            let _ = run(&mut grid, op);
        }
        let original = grid.layout();
        let before = grid.slots().to_vec();
        let keep = original.max_slots().min(other.max_slots());

        grid.resize(other);
        grid.resize(original);

        prop_assert_eq!(&grid.slots()[..keep], &before[..keep]);
        for slot in &grid.slots()[keep..] {
            prop_assert!(slot.is_empty(), "slot {} should have been lost", slot.position());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Snapshot round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn restore_reproduces_snapshot(
        mut grid in initial_grid(),
        ops in ops(30),
        later in ops(10),
    ) {
        for op in &ops {
            let _ = run(&mut grid, op);
        }
        let snap = grid.snapshot("prop").unwrap();
        let layout = grid.layout();
        let slots = grid.slots().to_vec();

        for op in &later {
            let _ = run(&mut grid, op);
        }
        grid.restore(&snap).unwrap();

        prop_assert_eq!(grid.layout(), layout);
        prop_assert_eq!(grid.slots(), slots.as_slice());
        prop_assert_eq!(grid.fullscreen(), None);
        check_invariants(&grid)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. File store round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn file_store_round_trip(mut grid in initial_grid(), ops in ops(30), name in "[a-z][a-z0-9 ]{0,12}") {
        for op in &ops {
            let _ = run(&mut grid, op);
        }
        let snap = grid.snapshot(&name).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("layouts.json"));
        store.save(&snap).unwrap();

        let loaded: LayoutSnapshot = store.load(snap.name()).unwrap().expect("saved layout");
        prop_assert_eq!(&loaded, &snap);

        let mut restored = SlotGrid::empty(Layout::OneByOne);
        restored.restore(&loaded).unwrap();
        prop_assert_eq!(restored.slots(), grid.slots());
        prop_assert_eq!(restored.layout(), grid.layout());
    }
}
