//! Grid slot layout.
//!
//! The [`SlotGrid`] struct manages the fixed-capacity collection of display
//! slots for the active [`Layout`].  Slot `i` always lives at index `i` of
//! the slot list, so a position is a permanent address within a layout size.
//!
//! Two invariants hold after every operation:
//!
//! * a [`StreamId`] is assigned to at most one slot, and
//! * at most one slot is fullscreen.
//!
//! Neither is ever reported as an error.  [`assign`](SlotGrid::assign)
//! detaches a stream from its previous slot before placing it, and
//! fullscreen is a single `Option<usize>` on the grid rather than a flag on
//! every slot.
//!
//! Every fallible operation validates its arguments before touching state,
//! so a returned error always means the grid is unchanged.

use crate::layout::Layout;
use crate::snapshot::{LayoutSnapshot, SlotRecord, SnapshotError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a stream in the external catalog.
///
/// The grid never looks inside it; identities are only compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(String);

impl StreamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StreamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    position: usize,
    stream: Option<StreamId>,
    is_muted: bool,
}

impl Slot {
    fn empty(position: usize) -> Self {
        Self {
            position,
            stream: None,
            is_muted: false,
        }
    }

    /// Permanent address of this slot within its layout.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The stream shown in this slot, if any.
    pub fn stream(&self) -> Option<&StreamId> {
        self.stream.as_ref()
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_none()
    }

    fn record(&self) -> SlotRecord {
        SlotRecord {
            position: self.position,
            stream: self.stream.clone(),
            is_muted: self.is_muted,
        }
    }
}

/// Possible errors from grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The position does not address a slot of the active layout.
    #[error("position {position} is outside the {max_slots}-slot grid")]
    InvalidPosition { position: usize, max_slots: usize },

    /// Fullscreen was requested on a slot with no stream.
    #[error("slot {0} is empty")]
    EmptySlot(usize),

    /// A snapshot was requested with a blank name.
    #[error("layout name must not be blank")]
    EmptyName,

    /// A snapshot handed to [`SlotGrid::restore`] breaks a grid invariant.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(#[from] SnapshotError),
}

/// Value snapshot of one slot, for observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub position: usize,
    /// Grid column, counted from the left.
    pub column: usize,
    /// Grid row, counted from the top.
    pub row: usize,
    pub stream: Option<StreamId>,
    pub is_muted: bool,
    pub is_fullscreen: bool,
}

/// Value snapshot of the whole grid, for observers.
///
/// Presentation code renders from this instead of borrowing the live grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub layout: Layout,
    pub columns: usize,
    pub fullscreen: Option<usize>,
    pub slots: Vec<SlotView>,
}

/// The grid slot and layout manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    layout: Layout,
    /// Always `layout.max_slots()` long; `slots[i].position == i`.
    slots: Vec<Slot>,
    /// The one slot shown fullscreen.  Always in range and non-empty.
    fullscreen: Option<usize>,
}

impl SlotGrid {
    /// Create a grid for `layout` and fill it with `initial` in order.
    ///
    /// Streams beyond the layout's capacity are dropped.  A stream that
    /// appears twice in `initial` only takes the first slot.
    pub fn new(layout: Layout, initial: impl IntoIterator<Item = StreamId>) -> Self {
        let mut grid = Self::empty(layout);
        let mut next = 0;
        for stream in initial {
            if next >= grid.slots.len() {
                break;
            }
            if grid.position_of(&stream).is_some() {
                debug!("skipping duplicate initial stream {}", stream);
                continue;
            }
            grid.slots[next].stream = Some(stream);
            next += 1;
        }
        grid
    }

    /// Create a grid with every slot empty.
    pub fn empty(layout: Layout) -> Self {
        Self {
            layout,
            slots: (0..layout.max_slots()).map(Slot::empty).collect(),
            fullscreen: None,
        }
    }

    //  Accessors

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// All slots in position order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, position: usize) -> Option<&Slot> {
        self.slots.get(position)
    }

    /// Position of the fullscreen slot, if any.
    pub fn fullscreen(&self) -> Option<usize> {
        self.fullscreen
    }

    pub fn is_fullscreen(&self, position: usize) -> bool {
        self.fullscreen == Some(position)
    }

    /// Where `stream` is currently shown.
    pub fn position_of(&self, stream: &StreamId) -> Option<usize> {
        self.slots
            .iter()
            .find(|s| s.stream.as_ref() == Some(stream))
            .map(|s| s.position)
    }

    /// `(position, stream)` for every occupied slot, in position order.
    pub fn assigned(&self) -> impl Iterator<Item = (usize, &StreamId)> {
        self.slots
            .iter()
            .filter_map(|s| s.stream.as_ref().map(|id| (s.position, id)))
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Whether no slot holds a stream.
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Build a [`GridView`] of the current state.
    pub fn view(&self) -> GridView {
        GridView {
            layout: self.layout,
            columns: self.layout.columns(),
            fullscreen: self.fullscreen,
            slots: self
                .slots
                .iter()
                .map(|s| {
                    let (column, row) = self.layout.cell(s.position).unwrap_or_default();
                    SlotView {
                        position: s.position,
                        column,
                        row,
                        stream: s.stream.clone(),
                        is_muted: s.is_muted,
                        is_fullscreen: self.is_fullscreen(s.position),
                    }
                })
                .collect(),
        }
    }

    //  Slot operations

    /// Show `stream` in the slot at `position`.
    ///
    /// If the stream is already shown elsewhere, that slot is cleared first
    /// so the stream moves.  Whatever the target slot showed before is
    /// unassigned.  The target slot is unmuted.
    pub fn assign(&mut self, stream: StreamId, position: usize) -> Result<&[Slot], GridError> {
        self.check(position)?;
        if let Some(previous) = self.position_of(&stream) {
            if previous != position {
                self.clear_slot(previous);
            }
        }
        let slot = &mut self.slots[position];
        if let Some(old) = slot.stream.as_ref().filter(|old| **old != stream) {
            debug!("slot {}: {} replaced by {}", position, old, stream);
        }
        slot.stream = Some(stream);
        slot.is_muted = false;
        Ok(&self.slots)
    }

    /// Clear the slot at `position`.  Clearing an empty slot does nothing.
    pub fn remove(&mut self, position: usize) -> Result<(), GridError> {
        self.check(position)?;
        if !self.slots[position].is_empty() {
            self.clear_slot(position);
        }
        Ok(())
    }

    /// Exchange the streams of two slots.
    ///
    /// Mute state stays with the position.  So does fullscreen, unless the
    /// fullscreen slot ends up empty, in which case fullscreen is exited.
    /// That last rule goes beyond a plain stream exchange: it keeps a
    /// fullscreen slot from ever showing nothing.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), GridError> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Ok(());
        }
        let stream_a = self.slots[a].stream.take();
        let stream_b = std::mem::replace(&mut self.slots[b].stream, stream_a);
        self.slots[a].stream = stream_b;
        if let Some(f) = self.fullscreen {
            if self.slots[f].is_empty() {
                self.fullscreen = None;
            }
        }
        Ok(())
    }

    /// Flip the mute flag of one slot.  Empty slots may be muted too.
    pub fn toggle_mute(&mut self, position: usize) -> Result<bool, GridError> {
        self.check(position)?;
        let slot = &mut self.slots[position];
        slot.is_muted = !slot.is_muted;
        Ok(slot.is_muted)
    }

    /// Show the slot at `position` fullscreen, leaving any other
    /// fullscreen slot.
    pub fn enter_fullscreen(&mut self, position: usize) -> Result<(), GridError> {
        self.check(position)?;
        if self.slots[position].is_empty() {
            return Err(GridError::EmptySlot(position));
        }
        self.fullscreen = Some(position);
        Ok(())
    }

    pub fn exit_fullscreen(&mut self) {
        self.fullscreen = None;
    }

    /// Leave fullscreen if `position` is the fullscreen slot, enter it
    /// otherwise.
    pub fn toggle_fullscreen(&mut self, position: usize) -> Result<(), GridError> {
        if self.is_fullscreen(position) {
            self.exit_fullscreen();
            Ok(())
        } else {
            self.enter_fullscreen(position)
        }
    }

    //  Whole-grid operations

    /// Switch to `layout`, keeping every slot whose position exists in both
    /// layouts.
    ///
    /// Shrinking drops the streams of the slots that no longer exist; they
    /// are not repacked into free slots.  The dropped streams are returned
    /// in position order.
    pub fn resize(&mut self, layout: Layout) -> Vec<StreamId> {
        let mut slots: Vec<Slot> = (0..layout.max_slots()).map(Slot::empty).collect();
        let mut dropped = Vec::new();
        for old in self.slots.drain(..) {
            match slots.get_mut(old.position) {
                Some(new) => {
                    new.stream = old.stream;
                    new.is_muted = old.is_muted;
                }
                None => dropped.extend(old.stream),
            }
        }
        self.layout = layout;
        self.slots = slots;
        if self.fullscreen.is_some_and(|f| !layout.contains(f)) {
            self.fullscreen = None;
        }
        dropped
    }

    /// Empty every slot, unmute everything and leave fullscreen.
    pub fn clear_all(&mut self) {
        self.slots = (0..self.layout.max_slots()).map(Slot::empty).collect();
        self.fullscreen = None;
    }

    //  Snapshots

    /// Capture the current layout and slots under `name`.
    ///
    /// The name is trimmed; a blank name is rejected.
    pub fn snapshot(&self, name: &str) -> Result<LayoutSnapshot, GridError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GridError::EmptyName);
        }
        Ok(LayoutSnapshot::capture(
            name,
            self.layout,
            self.slots.iter().map(Slot::record).collect(),
        ))
    }

    /// Replace the live layout and slots with a copy of `snapshot`'s.
    ///
    /// A restored grid never starts fullscreen.  The snapshot is validated
    /// first; an invalid one leaves the grid untouched.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot) -> Result<(), GridError> {
        snapshot.validate()?;
        self.layout = snapshot.layout();
        self.slots = snapshot
            .slots()
            .iter()
            .map(|r| Slot {
                position: r.position,
                stream: r.stream.clone(),
                is_muted: r.is_muted,
            })
            .collect();
        self.fullscreen = None;
        Ok(())
    }

    //  Internal

    pub(crate) fn check(&self, position: usize) -> Result<(), GridError> {
        if self.layout.contains(position) {
            Ok(())
        } else {
            Err(GridError::InvalidPosition {
                position,
                max_slots: self.layout.max_slots(),
            })
        }
    }

    fn clear_slot(&mut self, position: usize) {
        let slot = &mut self.slots[position];
        slot.stream = None;
        slot.is_muted = false;
        if self.fullscreen == Some(position) {
            self.fullscreen = None;
        }
    }
}

//  Tests
