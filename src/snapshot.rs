//! Named, immutable copies of a grid arrangement.
//!
//! A [`LayoutSnapshot`] is produced by [`SlotGrid::snapshot`] and handed to
//! a [`LayoutStore`](crate::traits::LayoutStore).  Its fields are private,
//! so once captured it can only be read, never edited.
//!
//! Snapshots read back from disk may have been edited by hand, so
//! [`LayoutSnapshot::validate`] re-checks the grid invariants before a
//! snapshot is restored.
//!
//! # JSON form
//!
//! ```json
//! {
//!   "name": "fav",
//!   "layout": "2x2",
//!   "slots": [
//!     { "position": 0, "stream": "shroud", "is_muted": false },
//!     { "position": 1, "is_muted": true },
//!     { "position": 2 },
//!     { "position": 3 }
//!   ],
//!   "created_at": "2026-10-19T12:00:00Z"
//! }
//! ```
//!
//! [`SlotGrid::snapshot`]: crate::grid::SlotGrid::snapshot

use crate::grid::StreamId;
use crate::layout::Layout;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One slot as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamId>,
    #[serde(default)]
    pub is_muted: bool,
}

/// A saved grid arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    name: String,
    layout: Layout,
    slots: Vec<SlotRecord>,
    created_at: DateTime<Utc>,
}

/// Listing entry for a saved snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub name: String,
    pub layout: Layout,
    /// Number of slots holding a stream.
    pub assigned: usize,
    pub created_at: DateTime<Utc>,
}

/// Reasons a snapshot cannot be restored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot name is blank")]
    BlankName,

    #[error("layout {layout} needs {expected} slots but the snapshot has {actual}")]
    SlotCount {
        layout: Layout,
        expected: usize,
        actual: usize,
    },

    #[error("slot at index {index} claims position {position}")]
    PositionMismatch { index: usize, position: usize },

    #[error("stream {0} appears in more than one slot")]
    DuplicateStream(StreamId),

    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

impl LayoutSnapshot {
    /// Stamp a new snapshot with the current time.
    pub(crate) fn capture(name: &str, layout: Layout, slots: Vec<SlotRecord>) -> Self {
        Self {
            name: name.to_string(),
            layout,
            slots,
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn slots(&self) -> &[SlotRecord] {
        &self.slots
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            name: self.name.clone(),
            layout: self.layout,
            assigned: self.slots.iter().filter(|s| s.stream.is_some()).count(),
            created_at: self.created_at,
        }
    }

    /// Check that restoring this snapshot yields a valid grid.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.name.trim().is_empty() {
            return Err(SnapshotError::BlankName);
        }
        let expected = self.layout.max_slots();
        if self.slots.len() != expected {
            return Err(SnapshotError::SlotCount {
                layout: self.layout,
                expected,
                actual: self.slots.len(),
            });
        }
        let mut seen = HashSet::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.position != index {
                return Err(SnapshotError::PositionMismatch {
                    index,
                    position: slot.position,
                });
            }
            if let Some(stream) = &slot.stream {
                if !seen.insert(stream) {
                    return Err(SnapshotError::DuplicateStream(stream.clone()));
                }
            }
        }
        Ok(())
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
