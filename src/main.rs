//! Entry point for the **streamgrid** daemon.
//!
//! Spawns the configured [`IntentSource`](streamgrid::traits::IntentSource)
//! on a background thread and processes incoming intents on the main
//! thread, which is the session's single writer.
//!
//! There is no video output here: the daemon drives a [`LogPlayer`] that
//! logs every playback call, so an embedding front end can follow along
//! from the log or attach its own player.

use streamgrid::catalog::StaticCatalog;
use streamgrid::config::{config_dir, Config};
use streamgrid::grid::{SlotGrid, StreamId};
use streamgrid::intent::Intent;
use streamgrid::ipc::listener::UnixSocketListener;
use streamgrid::session::GridSession;
use streamgrid::store::file::JsonFileStore;
use streamgrid::traits::{IntentSource, LayoutStore, Player};
use log::{debug, error, info, warn};
use std::sync::mpsc;

/// Default socket path for the intent listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/streamgrid.sock", runtime)
}

/// Try to load the config from `$XDG_CONFIG_HOME/streamgrid/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Logging player

/// A [`Player`] that only logs what it is asked to show.
struct LogPlayer;

impl Player for LogPlayer {
    fn present(&mut self, position: usize, stream: &StreamId, muted: bool) {
        info!("player: slot {} plays {}{}", position, stream, if muted { " (muted)" } else { "" });
    }

    fn set_muted(&mut self, position: usize, muted: bool) {
        info!("player: slot {} muted={}", position, muted);
    }

    fn clear(&mut self, position: usize) {
        info!("player: slot {} stopped", position);
    }

    fn set_fullscreen(&mut self, position: Option<usize>) {
        match position {
            Some(p) => info!("player: slot {} fullscreen", p),
            None => info!("player: grid view"),
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();

    let store = JsonFileStore::new(config.store.resolved_path());
    info!("saved layouts in {}", store.path().display());
    match store.list() {
        Ok(layouts) => {
            for l in &layouts {
                debug!("  {} ({}, {} streams)", l.name, l.layout, l.assigned);
            }
            info!("{} saved layout(s)", layouts.len());
        }
        Err(e) => warn!("cannot read saved layouts: {}", e),
    }

    let layout = config.grid.resolved_layout();
    let overflow = config.grid.overflow();
    if overflow > 0 {
        warn!("{} startup stream(s) did not fit a {} grid", overflow, layout);
    }
    let grid = SlotGrid::new(layout, config.grid.streams.clone());
    let mut session = GridSession::new(grid, store, LogPlayer);

    let catalog = StaticCatalog::new(config.catalog.clone());
    match session.available_streams(&catalog) {
        Ok(streams) => info!("{} catalog stream(s) available to assign", streams.len()),
        Err(e) => warn!("{}", e),
    }

    let (intent_tx, intent_rx) = mpsc::channel::<Intent>();
    spawn_intent_sources(intent_tx);

    info!("streamgrid running");
    for intent in intent_rx {
        if let Err(e) = session.handle(intent) {
            error!("intent error: {}", e);
        }
    }
    info!("all intent sources closed, exiting");
}

//  Helpers

fn spawn_intent_sources(tx: mpsc::Sender<Intent>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
