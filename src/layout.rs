//! Grid layout descriptors.
//!
//! A [`Layout`] is one of four square grid sizes.  It is a closed
//! enumeration, so every value is valid by construction and the derived
//! quantities ([`columns`](Layout::columns), [`max_slots`](Layout::max_slots))
//! are total functions.
//!
//! On the wire and in config files a layout is written as `"NxN"`
//! (e.g. `"2x2"`).  Parsing is lenient: `"2×2"`, `"2"`, `"TwoByTwo"` and
//! `"two_by_two"` are all accepted.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Square grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    OneByOne,
    #[default]
    TwoByTwo,
    ThreeByThree,
    FourByFour,
}

impl Layout {
    /// Every layout, smallest first.
    pub const ALL: [Layout; 4] = [
        Layout::OneByOne,
        Layout::TwoByTwo,
        Layout::ThreeByThree,
        Layout::FourByFour,
    ];

    /// Number of columns (and rows).
    pub fn columns(self) -> usize {
        match self {
            Layout::OneByOne => 1,
            Layout::TwoByTwo => 2,
            Layout::ThreeByThree => 3,
            Layout::FourByFour => 4,
        }
    }

    /// Slot capacity, `columns²`.
    pub fn max_slots(self) -> usize {
        self.columns() * self.columns()
    }

    /// Whether `position` addresses a slot of this layout.
    pub fn contains(self, position: usize) -> bool {
        position < self.max_slots()
    }

    /// `(col, row)` of `position` in row-major order, or `None` when the
    /// position is out of range.
    pub fn cell(self, position: usize) -> Option<(usize, usize)> {
        if !self.contains(position) {
            return None;
        }
        let cols = self.columns();
        Some((position % cols, position / cols))
    }

    /// Smallest layout that can show `count` streams.  Counts beyond 16
    /// saturate at [`Layout::FourByFour`].
    pub fn for_stream_count(count: usize) -> Layout {
        Self::ALL
            .into_iter()
            .find(|l| l.max_slots() >= count)
            .unwrap_or(Layout::FourByFour)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.columns();
        write!(f, "{}x{}", n, n)
    }
}

/// Parse a layout string (case-insensitive; accepts "2x2", "2×2", "2",
/// "TwoByTwo", "two_by_two").
fn parse_layout(s: &str) -> Option<Layout> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "1x1" | "1×1" | "1" | "onebyone" => Some(Layout::OneByOne),
        "2x2" | "2×2" | "2" | "twobytwo" => Some(Layout::TwoByTwo),
        "3x3" | "3×3" | "3" | "threebythree" => Some(Layout::ThreeByThree),
        "4x4" | "4×4" | "4" | "fourbyfour" => Some(Layout::FourByFour),
        _ => None,
    }
}

/// Error returned when a string does not name a layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid layout: {0:?} (expected 1x1, 2x2, 3x3 or 4x4)")]
pub struct ParseLayoutError(String);

impl FromStr for Layout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_layout(s).ok_or_else(|| ParseLayoutError(s.to_string()))
    }
}

impl Serialize for Layout {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_layout(&s).ok_or_else(|| DeError::custom(format!("invalid layout: {:?}", s)))
    }
}
