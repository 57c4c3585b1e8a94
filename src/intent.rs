//! Intents issued by the presentation layer.
//!
//! [`Intent`] describes every request the session can act on.  Intents are
//! plain data so they can cross a channel or a socket; their JSON form is
//! serde's externally tagged enum encoding:
//!
//! ```json
//! {"Assign":{"stream":"shroud","position":2}}
//! {"Swap":{"a":0,"b":3}}
//! {"Swap":"0 3"}
//! {"ToggleMute":1}
//! {"Resize":"3x3"}
//! "ClearAll"
//! {"SaveLayout":"evening"}
//! ```
//!
//! Slot positions accept a number or a numeric string, and a swap accepts
//! either `{"a", "b"}`, `[a, b]` or `"a b"`, so thin clients (shell
//! scripts, key-bind helpers) can send whatever is easiest.

use crate::grid::StreamId;
use crate::layout::Layout;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Wire format for a slot position: accepts number or string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlotIndex(pub usize);

impl<'de> Deserialize<'de> for SlotIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = SlotIndex;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "non-negative integer or string")
            }
            fn visit_u64<E>(self, n: u64) -> Result<SlotIndex, E>
            where
                E: DeError,
            {
                usize::try_from(n)
                    .map(SlotIndex)
                    .map_err(|_| DeError::custom("slot position too large"))
            }
            fn visit_i64<E>(self, n: i64) -> Result<SlotIndex, E>
            where
                E: DeError,
            {
                usize::try_from(n)
                    .map(SlotIndex)
                    .map_err(|_| DeError::custom("slot position must be non-negative"))
            }
            fn visit_str<E>(self, s: &str) -> Result<SlotIndex, E>
            where
                E: DeError,
            {
                let n: usize = s
                    .trim()
                    .parse()
                    .map_err(|_| DeError::custom("slot position: expected non-negative integer"))?;
                Ok(SlotIndex(n))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Wire format for Swap: accepts `{"a":0,"b":1}`, `[0, 1]` or `"0 1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotPair {
    pub a: usize,
    pub b: usize,
}

impl<'de> Deserialize<'de> for SlotPair {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = SlotPair;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "object {{a, b}}, array [a, b] or string \"a b\"")
            }
            fn visit_map<A>(self, mut map: A) -> Result<SlotPair, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut a: Option<SlotIndex> = None;
                let mut b: Option<SlotIndex> = None;
                while let Some(k) = map.next_key::<String>()? {
                    match k.as_str() {
                        "a" => a = Some(map.next_value()?),
                        "b" => b = Some(map.next_value()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                Ok(SlotPair {
                    a: a.ok_or_else(|| DeError::missing_field("a"))?.0,
                    b: b.ok_or_else(|| DeError::missing_field("b"))?.0,
                })
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<SlotPair, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let a: SlotIndex = seq
                    .next_element()?
                    .ok_or_else(|| DeError::invalid_length(0, &self))?;
                let b: SlotIndex = seq
                    .next_element()?
                    .ok_or_else(|| DeError::invalid_length(1, &self))?;
                Ok(SlotPair { a: a.0, b: b.0 })
            }
            fn visit_str<E>(self, s: &str) -> Result<SlotPair, E>
            where
                E: DeError,
            {
                let parts: Vec<&str> = s.split_whitespace().collect();
                if parts.len() != 2 {
                    return Err(DeError::custom(format!("Swap: expected \"a b\", got {:?}", s)));
                }
                let a: usize = parts[0]
                    .parse()
                    .map_err(|_| DeError::custom("Swap: a must be a non-negative integer"))?;
                let b: usize = parts[1]
                    .parse()
                    .map_err(|_| DeError::custom("Swap: b must be a non-negative integer"))?;
                Ok(SlotPair { a, b })
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every request the grid session can act on.
///
/// Intents are produced by [`IntentSource`](crate::traits::IntentSource)
/// implementations and consumed by the
/// [`GridSession`](crate::session::GridSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Show `stream` at `position`, moving it if it is shown elsewhere.
    Assign { stream: StreamId, position: SlotIndex },

    /// Empty the slot.
    Remove(SlotIndex),

    /// Exchange the streams of two slots.
    Swap(SlotPair),

    /// Flip one slot's mute flag.
    ToggleMute(SlotIndex),

    /// Show one slot fullscreen.
    EnterFullscreen(SlotIndex),

    /// Return to the grid.
    ExitFullscreen,

    /// Enter fullscreen on a slot, or leave it if that slot already is.
    ToggleFullscreen(SlotIndex),

    /// Change the grid size, keeping slots that exist in both sizes.
    Resize(Layout),

    /// Empty every slot.
    ClearAll,

    //  Drag and drop

    /// A stream was picked up, either from a slot or from the catalog.
    DragStart(StreamId),

    /// The drag ended outside the grid.
    DragCancel,

    /// The dragged stream was released over a slot.
    Drop(SlotIndex),

    //  Saved layouts

    /// Save the current arrangement under a name, overwriting any layout
    /// already saved with that name.
    SaveLayout(String),

    /// Replace the current arrangement with a saved one.
    LoadLayout(String),

    /// Forget a saved layout.
    DeleteLayout(String),
}
