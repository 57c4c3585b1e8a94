//! JSON file [`LayoutStore`].
//!
//! All saved layouts live in one JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "layouts": {
//!     "fav": { "name": "fav", "layout": "1x1", "slots": [ … ], "created_at": "…" }
//!   }
//! }
//! ```
//!
//! The file is re-read on every call, so edits made by another process are
//! picked up and the last successful save wins.  Writes go to a sibling
//! temporary file which is then renamed over the original; a failed write
//! never leaves a half-written document behind.

use super::StoreError;
use crate::snapshot::{LayoutSnapshot, SnapshotInfo};
use crate::traits::LayoutStore;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Current layout file schema version.
const SCHEMA_VERSION: u32 = 1;

fn schema_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default = "schema_version")]
    version: u32,
    #[serde(default)]
    layouts: BTreeMap<String, LayoutSnapshot>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            layouts: BTreeMap::new(),
        }
    }
}

/// A [`LayoutStore`] that keeps every snapshot in one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`.
    ///
    /// Nothing is touched until the first call; a missing file reads as an
    /// empty store and is created (with its parent directories) on the
    /// first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<StoreDocument, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet, treating as empty", self.path.display());
                return Ok(StoreDocument::default());
            }
            Err(e) => return Err(e.into()),
        };
        let doc: StoreDocument = serde_json::from_str(&contents)?;
        if doc.version > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion(doc.version));
        }
        Ok(doc)
    }

    fn write_document(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(doc)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl LayoutStore for JsonFileStore {
    type Error = StoreError;

    fn save(&mut self, snapshot: &LayoutSnapshot) -> Result<(), StoreError> {
        snapshot
            .validate()
            .map_err(|source| StoreError::InvalidSnapshot {
                name: snapshot.name().to_string(),
                source,
            })?;
        let mut doc = self.read_document()?;
        doc.version = SCHEMA_VERSION;
        doc.layouts
            .insert(snapshot.name().to_string(), snapshot.clone());
        self.write_document(&doc)?;
        debug!("saved layout {:?} to {}", snapshot.name(), self.path.display());
        Ok(())
    }

    fn list(&self) -> Result<Vec<SnapshotInfo>, StoreError> {
        let doc = self.read_document()?;
        Ok(doc
            .layouts
            .iter()
            .filter(|(key, snap)| {
                let usable = key.as_str() == snap.name() && snap.validate().is_ok();
                if !usable {
                    warn!("skipping invalid saved layout {:?}", key);
                }
                usable
            })
            .map(|(_, snap)| snap.info())
            .collect())
    }

    fn load(&self, name: &str) -> Result<Option<LayoutSnapshot>, StoreError> {
        let mut doc = self.read_document()?;
        let Some(snapshot) = doc.layouts.remove(name) else {
            return Ok(None);
        };
        snapshot
            .validate()
            .map_err(|source| StoreError::InvalidSnapshot {
                name: name.to_string(),
                source,
            })?;
        Ok(Some(snapshot))
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let mut doc = self.read_document()?;
        if doc.layouts.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.write_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{SlotGrid, StreamId};
    use crate::layout::Layout;

    fn grid(layout: Layout, streams: &[&str]) -> SlotGrid {
        SlotGrid::new(layout, streams.iter().map(|s| StreamId::from(*s)))
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("layouts.json"));
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.load("fav").unwrap(), None);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("layouts.json");
        let mut store = JsonFileStore::new(&path);
        store
            .save(&grid(Layout::OneByOne, &["a"]).snapshot("fav").unwrap())
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layouts.json");
        let mut g = grid(Layout::ThreeByThree, &["a", "b", "c"]);
        g.toggle_mute(1).unwrap();
        let snap = g.snapshot("evening").unwrap();
        JsonFileStore::new(&path).save(&snap).unwrap();

        let reopened = JsonFileStore::new(&path);
        let loaded = reopened.load("evening").unwrap().expect("saved layout");
        assert_eq!(loaded, snap);

        let mut restored = SlotGrid::empty(Layout::OneByOne);
        restored.restore(&loaded).unwrap();
        assert_eq!(restored.slots(), g.slots());
        assert_eq!(restored.layout(), Layout::ThreeByThree);
    }

    #[test]
    fn save_same_name_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("layouts.json"));
        store
            .save(&grid(Layout::TwoByTwo, &["a"]).snapshot("fav").unwrap())
            .unwrap();
        let second = grid(Layout::OneByOne, &["z"]).snapshot("fav").unwrap();
        store.save(&second).unwrap();
        let infos = store.list().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].layout, Layout::OneByOne);
        assert_eq!(store.load("fav").unwrap(), Some(second));
    }

    #[test]
    fn list_orders_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("layouts.json"));
        for name in ["b", "c", "a"] {
            store
                .save(&grid(Layout::TwoByTwo, &["x"]).snapshot(name).unwrap())
                .unwrap();
        }
        let names: Vec<String> = store.list().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn delete_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("layouts.json"));
        store
            .save(&grid(Layout::TwoByTwo, &["a"]).snapshot("fav").unwrap())
            .unwrap();
        store.delete("fav").unwrap();
        assert_eq!(store.load("fav").unwrap(), None);
        assert!(matches!(store.delete("fav"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("layouts.json"));
        store
            .save(&grid(Layout::TwoByTwo, &["a"]).snapshot("fav").unwrap())
            .unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["layouts.json".to_string()]);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layouts.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.list(), Err(StoreError::Json(_))));
    }

    #[test]
    fn newer_schema_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layouts.json");
        std::fs::write(&path, r#"{ "version": 99, "layouts": {} }"#).unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.list(), Err(StoreError::UnsupportedVersion(99))));
    }

    #[test]
    fn hand_edited_invalid_layout_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layouts.json");
        std::fs::write(
            &path,
            r#"{
                "version": 1,
                "layouts": {
                    "broken": {
                        "name": "broken",
                        "layout": "2x2",
                        "slots": [ { "position": 0, "stream": "a" } ],
                        "created_at": "2026-10-19T12:00:00Z"
                    }
                }
            }"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.load("broken"),
            Err(StoreError::InvalidSnapshot { .. })
        ));
        assert!(store.list().unwrap().is_empty(), "invalid entries are not listed");
    }
}
