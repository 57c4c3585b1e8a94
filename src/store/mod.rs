//! [`LayoutStore`](crate::traits::LayoutStore) implementations.
//!
//! [`memory::MemoryStore`] keeps snapshots in a map for tests and
//! throwaway sessions; [`file::JsonFileStore`] persists them to a single
//! JSON document on disk.

pub mod file;
pub mod memory;

use crate::snapshot::SnapshotError;

/// Errors produced by the bundled layout stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no saved layout named {0:?}")]
    NotFound(String),

    #[error("saved layout {name:?} is invalid: {source}")]
    InvalidSnapshot {
        name: String,
        #[source]
        source: SnapshotError,
    },

    #[error("unsupported layout file version {0}")]
    UnsupportedVersion(u32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
