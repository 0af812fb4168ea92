//! Fixture product source

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::info;

use super::{ProductSource, SourceError, decode_json, decode_yaml};
use crate::products::ProductMap;

/// Reads products from a YAML or JSON file.
///
/// Files ending in `.json` are read as JSON, anything else as YAML. Both accept
/// the same payload shapes as the HTTP source.
#[derive(Debug, Clone)]
pub struct FixtureProductSource {
    path: PathBuf,
}

impl FixtureProductSource {
    /// Create a source reading `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fixture path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
    }
}

#[async_trait]
impl ProductSource for FixtureProductSource {
    async fn fetch_products(&self) -> Result<ProductMap, SourceError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let products = if self.is_json() {
            decode_json(&contents)?
        } else {
            decode_yaml(&contents)?
        };

        info!(path = %self.path.display(), products = products.len(), "products loaded from fixture");

        Ok(products)
    }
}
