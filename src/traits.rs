//! Core traits that decouple streamgrid from any specific storage, player or
//! transport.
//!
//! Every concrete backend (a JSON file, an in-memory map, a Unix-socket
//! listener, a test harness, …) implements one of these traits.  The
//! [`GridSession`](crate::session::GridSession) only depends on these
//! abstractions.

use crate::grid::{GridView, StreamId};
use crate::intent::Intent;
use crate::snapshot::{LayoutSnapshot, SnapshotInfo};
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

//  Persistence

/// Durable storage for named [`LayoutSnapshot`]s.
///
/// Saving a name that already exists overwrites it.  Implementations need
/// not be transactional beyond "the last successful save wins".
pub trait LayoutStore {
    /// The error type produced by this store.
    type Error: std::error::Error + Send + 'static;

    /// Store `snapshot` under its name.
    fn save(&mut self, snapshot: &LayoutSnapshot) -> Result<(), Self::Error>;

    /// Metadata for every saved snapshot, ordered by name.
    fn list(&self) -> Result<Vec<SnapshotInfo>, Self::Error>;

    /// The snapshot saved as `name`, or `None` if there is none.
    fn load(&self, name: &str) -> Result<Option<LayoutSnapshot>, Self::Error>;

    /// Forget the snapshot saved as `name`.  Deleting an unknown name is an
    /// error.
    fn delete(&mut self, name: &str) -> Result<(), Self::Error>;
}

//  Player

/// The component that actually shows a stream in a slot.
///
/// Calls are fire-and-forget: the session never waits for a player to be
/// ready and never learns whether playback started.
pub trait Player {
    /// Start showing `stream` in `position`, replacing whatever was there.
    fn present(&mut self, position: usize, stream: &StreamId, muted: bool);

    /// Change the audio of the stream already playing in `position`.
    fn set_muted(&mut self, position: usize, muted: bool);

    /// Stop playback in `position`.
    fn clear(&mut self, position: usize);

    /// Show `position` fullscreen, or return to the grid on `None`.
    fn set_fullscreen(&mut self, position: Option<usize>);
}

//  Stream catalog

/// Catalog entry describing a known stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub id: StreamId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub viewer_count: u64,
}

/// Read-only source of known streams, used to populate the assign picker.
pub trait StreamCatalog {
    /// The error type produced by this catalog.
    type Error: std::error::Error + Send + 'static;

    /// Every stream the catalog knows, in display order.
    fn list_available(&self) -> Result<Vec<StreamInfo>, Self::Error>;
}

//  Observers

/// Events sent from the [`GridSession`](crate::session::GridSession) to
/// observers over an [`mpsc`](std::sync::mpsc) channel.
///
/// Observers get value snapshots and never touch the live grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// The grid changed; here is its new state.
    Changed(GridView),

    /// A layout was written to the store.
    LayoutSaved(String),

    /// A layout was removed from the store.
    LayoutDeleted(String),
}

//  Intent Source

/// A source of [`Intent`]s.
///
/// Implementations listen on some transport (a Unix socket, a UI event
/// queue, a test harness) and forward parsed intents into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](IntentSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received intent must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait IntentSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Intent`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Intent>) -> Result<(), Self::Error>;
}
