//! In-memory [`LayoutStore`].

use super::StoreError;
use crate::snapshot::{LayoutSnapshot, SnapshotInfo};
use crate::traits::LayoutStore;
use std::collections::BTreeMap;

/// A [`LayoutStore`] backed by a `BTreeMap`.  Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    layouts: BTreeMap<String, LayoutSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl LayoutStore for MemoryStore {
    type Error = StoreError;

    fn save(&mut self, snapshot: &LayoutSnapshot) -> Result<(), StoreError> {
        snapshot
            .validate()
            .map_err(|source| StoreError::InvalidSnapshot {
                name: snapshot.name().to_string(),
                source,
            })?;
        self.layouts
            .insert(snapshot.name().to_string(), snapshot.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<SnapshotInfo>, StoreError> {
        Ok(self.layouts.values().map(LayoutSnapshot::info).collect())
    }

    fn load(&self, name: &str) -> Result<Option<LayoutSnapshot>, StoreError> {
        Ok(self.layouts.get(name).cloned())
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        self.layouts
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
