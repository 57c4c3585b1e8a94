//! A [`StreamCatalog`] serving a fixed list, usually from the config file.

use crate::traits::{StreamCatalog, StreamInfo};
use std::convert::Infallible;

/// Catalog backed by a list known up front.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    streams: Vec<StreamInfo>,
}

impl StaticCatalog {
    pub fn new(streams: Vec<StreamInfo>) -> Self {
        Self { streams }
    }
}

impl StreamCatalog for StaticCatalog {
    type Error = Infallible;

    fn list_available(&self) -> Result<Vec<StreamInfo>, Infallible> {
        Ok(self.streams.clone())
    }
}
