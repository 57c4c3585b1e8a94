//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/streamgrid/config.json`.  Every section is optional so
//! the file can grow new sections without breaking older ones.
//!
//! # Example
//!
//! ```json
//! {
//!   "grid": {
//!     "layout": "2x2",
//!     "streams": ["shroud", "pokimane"]
//!   },
//!   "store": {
//!     "path": "/home/me/.local/share/streamgrid/layouts.json"
//!   },
//!   "catalog": [
//!     { "id": "shroud", "title": "Shroud", "is_live": true, "viewer_count": 30000 },
//!     { "id": "pokimane", "title": "Pokimane", "is_live": false }
//!   ]
//! }
//! ```

use crate::grid::StreamId;
use crate::layout::Layout;
use crate::traits::StreamInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every field is optional: a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Grid shown at startup.
    #[serde(default)]
    pub grid: GridConfig,

    /// Where saved layouts are kept.
    #[serde(default)]
    pub store: StoreConfig,

    /// Streams offered in the assign picker.
    #[serde(default)]
    pub catalog: Vec<StreamInfo>,
}

/// Startup grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Grid size.  When unset, the smallest layout that fits `streams` is
    /// used, or `2x2` if there are none.
    pub layout: Option<Layout>,
    /// Streams placed in the first slots, in order.  Extra streams beyond
    /// the layout's capacity are ignored.
    pub streams: Vec<StreamId>,
}

impl GridConfig {
    /// The layout to start with.
    pub fn resolved_layout(&self) -> Layout {
        match self.layout {
            Some(layout) => layout,
            None if self.streams.is_empty() => Layout::default(),
            None => Layout::for_stream_count(self.streams.len()),
        }
    }

    /// Distinct startup streams that do not fit the resolved layout.
    /// Repeats of a stream are not counted.
    pub fn overflow(&self) -> usize {
        let distinct: HashSet<&StreamId> = self.streams.iter().collect();
        distinct.len().saturating_sub(self.resolved_layout().max_slots())
    }
}

/// Layout store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the saved-layouts file.  Default:
    /// `$XDG_DATA_HOME/streamgrid/layouts.json`.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// The configured path, or the default under the XDG data directory.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| data_dir().join("layouts.json"))
    }
}

/// Resolve the data directory (`$XDG_DATA_HOME/streamgrid`).
fn data_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.local/share", home)
    });
    PathBuf::from(base).join("streamgrid")
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/streamgrid`).
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("streamgrid")
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
