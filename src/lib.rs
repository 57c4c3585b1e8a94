//! **streamgrid** — a multi-stream viewing grid.
//!
//! Several live streams are shown side by side in a square grid of 1×1,
//! 2×2, 3×3 or 4×4 slots.  Each slot can be muted, shown fullscreen or
//! emptied; streams can be dragged between slots; and whole arrangements
//! can be saved under a name and restored later.
//!
//! # Architecture
//!
//! The core is [`grid::SlotGrid`], which owns the slots of the active
//! [`layout::Layout`] and keeps two invariants by construction: a stream is
//! shown in at most one slot, and at most one slot is fullscreen.
//! [`dragdrop`] turns a drop gesture into primitive grid operations and
//! [`snapshot`] holds the saved form of an arrangement.
//!
//! [`session::GridSession`] is the single writer around the grid.  It is
//! organised around three traits:
//!
//! * [`traits::LayoutStore`] — keeps named snapshots (see [`store`]).
//! * [`traits::Player`] — shows streams; the session only tells it which
//!   slot changed.
//! * [`traits::IntentSource`] — delivers user intents from some transport
//!   (see [`ipc`]).
//!
//! Observers follow along through [`traits::GridEvent`] value snapshots.

pub mod catalog;
pub mod config;
pub mod dragdrop;
pub mod grid;
pub mod intent;
pub mod ipc;
pub mod layout;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod traits;
