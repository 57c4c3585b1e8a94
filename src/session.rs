//! The orchestrator that ties the grid, the layout store and the player
//! together.
//!
//! [`GridSession`] owns the [`SlotGrid`] and reacts to [`Intent`]s by
//! updating the grid and then bringing the [`Player`] and any observers in
//! line with the new state.  It is the single writer of the grid: intents
//! are handled one at a time and each one finishes before the next starts.

use crate::grid::{GridError, SlotGrid, StreamId};
use crate::intent::{Intent, SlotIndex, SlotPair};
use crate::snapshot::SnapshotInfo;
use crate::traits::{GridEvent, LayoutStore, Player, StreamCatalog, StreamInfo};
use log::{debug, info, warn};
use std::sync::mpsc;

/// Possible errors from the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The grid rejected the operation.  The grid is unchanged.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The layout store returned an error.
    #[error("layout store error: {0}")]
    Store(String),

    /// The requested saved layout does not exist.
    #[error("no saved layout named {0:?}")]
    LayoutNotFound(String),

    /// A drop arrived without a preceding drag.
    #[error("no drag in progress")]
    NoActiveDrag,

    /// The stream catalog returned an error.
    #[error("stream catalog error: {0}")]
    Catalog(String),
}

/// Orchestrates grid mutations, persistence and playback.
///
/// The session is generic over any [`LayoutStore`] and [`Player`], making it
/// independent of where layouts are kept and how streams are rendered.
///
/// # Typical usage
///
/// ```ignore
/// let grid = SlotGrid::new(Layout::TwoByTwo, [StreamId::from("shroud")]);
/// let mut session = GridSession::new(grid, MemoryStore::new(), player);
/// session.handle(Intent::Resize(Layout::ThreeByThree))?;
/// session.handle(Intent::SaveLayout("evening".into()))?;
/// ```
pub struct GridSession<S: LayoutStore, P: Player> {
    grid: SlotGrid,
    store: S,
    player: P,
    observer: Option<mpsc::Sender<GridEvent>>,
    active_drag: Option<StreamId>,
}

impl<S: LayoutStore, P: Player> GridSession<S, P> {
    /// Create a session and start playback for every stream already in
    /// `grid`.
    pub fn new(grid: SlotGrid, store: S, player: P) -> Self {
        let blank = SlotGrid::empty(grid.layout());
        let mut session = Self {
            grid,
            store,
            player,
            observer: None,
            active_drag: None,
        };
        session.sync_player(&blank);
        session
    }

    /// Attach an observer channel.
    ///
    /// The session sends [`GridEvent::Changed`] after every intent that
    /// changed the grid, and [`GridEvent::LayoutSaved`] /
    /// [`GridEvent::LayoutDeleted`] after store writes.  The current state
    /// is sent right away so a new observer can render immediately.
    pub fn set_observer(&mut self, tx: mpsc::Sender<GridEvent>) {
        let _ = tx.send(GridEvent::Changed(self.grid.view()));
        self.observer = Some(tx);
    }

    /// Return a shared reference to the underlying grid.
    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// The stream currently being dragged, if any.
    pub fn active_drag(&self) -> Option<&StreamId> {
        self.active_drag.as_ref()
    }

    /// Process a single [`Intent`].
    ///
    /// On error the grid is unchanged and nothing is sent to the player or
    /// observers.
    pub fn handle(&mut self, intent: Intent) -> Result<(), SessionError> {
        let before = self.grid.clone();
        self.apply(intent)?;
        if self.grid != before {
            self.sync_player(&before);
            self.notify(GridEvent::Changed(self.grid.view()));
        }
        Ok(())
    }

    fn apply(&mut self, intent: Intent) -> Result<(), SessionError> {
        match intent {
            Intent::Assign {
                stream,
                position: SlotIndex(position),
            } => {
                info!("assign {} to slot {}", stream, position);
                self.grid.assign(stream, position)?;
            }

            Intent::Remove(SlotIndex(position)) => {
                info!("remove slot {}", position);
                self.grid.remove(position)?;
            }

            Intent::Swap(SlotPair { a, b }) => {
                info!("swap slots {} and {}", a, b);
                self.grid.swap(a, b)?;
            }

            Intent::ToggleMute(SlotIndex(position)) => {
                let muted = self.grid.toggle_mute(position)?;
                info!("slot {} {}", position, if muted { "muted" } else { "unmuted" });
            }

            Intent::EnterFullscreen(SlotIndex(position)) => {
                info!("fullscreen slot {}", position);
                self.grid.enter_fullscreen(position)?;
            }

            Intent::ExitFullscreen => {
                debug!("exit fullscreen");
                self.grid.exit_fullscreen();
            }

            Intent::ToggleFullscreen(SlotIndex(position)) => {
                debug!("toggle fullscreen on slot {}", position);
                self.grid.toggle_fullscreen(position)?;
            }

            Intent::Resize(layout) => {
                info!("resize {} -> {}", self.grid.layout(), layout);
                let dropped = self.grid.resize(layout);
                if !dropped.is_empty() {
                    let names: Vec<&str> = dropped.iter().map(StreamId::as_str).collect();
                    warn!("shrinking to {} dropped {}", layout, names.join(", "));
                }
            }

            Intent::ClearAll => {
                info!("clear all slots");
                self.grid.clear_all();
            }

            //  Drag and drop

            Intent::DragStart(stream) => {
                debug!("drag start: {}", stream);
                self.active_drag = Some(stream);
            }

            Intent::DragCancel => {
                if let Some(stream) = self.active_drag.take() {
                    debug!("drag cancelled: {}", stream);
                }
            }

            Intent::Drop(SlotIndex(target)) => {
                // The gesture is over either way, so the drag is consumed
                // even when the drop is rejected.
                let stream = self.active_drag.take().ok_or(SessionError::NoActiveDrag)?;
                let ops = self.grid.drop_stream(&stream, target)?;
                info!("drop {} on slot {}: {:?}", stream, target, ops);
            }

            //  Saved layouts

            Intent::SaveLayout(name) => self.save_layout(&name)?,
            Intent::LoadLayout(name) => self.load_layout(&name)?,
            Intent::DeleteLayout(name) => self.delete_layout(&name)?,
        }
        Ok(())
    }

    //  Saved layouts

    /// Snapshot the grid and write it to the store under `name`.
    ///
    /// An existing layout with the same name is overwritten.
    pub fn save_layout(&mut self, name: &str) -> Result<(), SessionError> {
        let snapshot = self.grid.snapshot(name)?;
        self.store
            .save(&snapshot)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        info!("saved layout {:?} ({})", snapshot.name(), snapshot.layout());
        self.notify(GridEvent::LayoutSaved(snapshot.name().to_string()));
        Ok(())
    }

    /// Replace the grid with the layout saved as `name`.
    ///
    /// The grid is only touched once the store has returned a valid
    /// snapshot; any failure before that leaves it as it was.  Call through
    /// [`handle`](Self::handle) to have the player and observers updated.
    fn load_layout(&mut self, name: &str) -> Result<(), SessionError> {
        let name = layout_name(name)?;
        let snapshot = self
            .store
            .load(name)
            .map_err(|e| SessionError::Store(e.to_string()))?
            .ok_or_else(|| SessionError::LayoutNotFound(name.to_string()))?;
        self.grid.restore(&snapshot)?;
        info!("loaded layout {:?} ({})", snapshot.name(), snapshot.layout());
        Ok(())
    }

    /// Remove the layout saved as `name` from the store.
    ///
    /// The name is trimmed the same way [`save_layout`](Self::save_layout)
    /// trims it.
    pub fn delete_layout(&mut self, name: &str) -> Result<(), SessionError> {
        let name = layout_name(name)?;
        self.store
            .delete(name)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        info!("deleted layout {:?}", name);
        self.notify(GridEvent::LayoutDeleted(name.to_string()));
        Ok(())
    }

    /// Metadata of every saved layout, ordered by name.
    pub fn saved_layouts(&self) -> Result<Vec<SnapshotInfo>, SessionError> {
        self.store
            .list()
            .map_err(|e| SessionError::Store(e.to_string()))
    }

    /// Catalog streams that are not on the grid yet, in catalog order.
    pub fn available_streams<C: StreamCatalog>(
        &self,
        catalog: &C,
    ) -> Result<Vec<StreamInfo>, SessionError> {
        let streams = catalog
            .list_available()
            .map_err(|e| SessionError::Catalog(e.to_string()))?;
        Ok(streams
            .into_iter()
            .filter(|s| self.grid.position_of(&s.id).is_none())
            .collect())
    }

    //  Output helpers

    fn notify(&self, event: GridEvent) {
        if let Some(tx) = &self.observer {
            let _ = tx.send(event);
        }
    }

    /// Tell the player about every slot that differs from `before`.
    ///
    /// A slot whose stream changed is presented (or cleared); a slot that
    /// kept its stream but changed mute only gets [`Player::set_muted`].
    fn sync_player(&mut self, before: &SlotGrid) {
        let old = before.slots();
        for slot in self.grid.slots() {
            let position = slot.position();
            let previous = old.get(position);
            match (previous.and_then(|p| p.stream()), slot.stream()) {
                (Some(was), Some(now)) if was == now => {
                    if previous.is_some_and(|p| p.is_muted() != slot.is_muted()) {
                        debug!("  slot {} muted={}", position, slot.is_muted());
                        self.player.set_muted(position, slot.is_muted());
                    }
                }
                (_, Some(now)) => {
                    debug!("  slot {} -> {}", position, now);
                    self.player.present(position, now, slot.is_muted());
                }
                (Some(_), None) => {
                    debug!("  slot {} cleared", position);
                    self.player.clear(position);
                }
                (None, None) => {}
            }
        }
        for gone in old.iter().skip(self.grid.slots().len()) {
            if !gone.is_empty() {
                debug!("  slot {} removed by resize", gone.position());
                self.player.clear(gone.position());
            }
        }
        if before.fullscreen() != self.grid.fullscreen() {
            self.player.set_fullscreen(self.grid.fullscreen());
        }
    }
}

/// Saved layouts are keyed by their trimmed name.
fn layout_name(name: &str) -> Result<&str, GridError> {
    let name = name.trim();
    if name.is_empty() {
        Err(GridError::EmptyName)
    } else {
        Ok(name)
    }
}

//  Tests
