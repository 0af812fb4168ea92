//! Product sources
//!
//! Where the catalog comes from. The storefront fetches once at start-up and
//! treats any failure as an empty catalog.

use std::{io, path::PathBuf};

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::products::{ProductMap, RawProduct};

mod fixture;
mod http;

pub use fixture::FixtureProductSource;
pub use http::{DEFAULT_API_URL, HttpProductSource};

/// Product source errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request could not be sent or the body not read.
    #[error("product request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("product request returned status {0}")]
    Status(u16),

    /// The JSON payload is not a product list.
    #[error("failed to decode products: {0}")]
    Decode(#[from] serde_json::Error),

    /// The YAML payload is not a product list.
    #[error("failed to parse product YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The fixture file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Fixture path
        path: PathBuf,

        /// Underlying error
        source: io::Error,
    },
}

/// Supplies the raw product mapping the catalog is built from.
#[automock]
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the products cannot be retrieved or
    /// decoded.
    async fn fetch_products(&self) -> Result<ProductMap, SourceError>;
}

/// Product list, either as records carrying their own ids or keyed by id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductRecords {
    List(Vec<RawProduct>),
    Keyed(ProductMap),
}

/// The payload shapes the products endpoint has been seen to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductsPayload {
    Bare(Vec<RawProduct>),
    Data { data: ProductRecords },
    Products { products: ProductRecords },
    Items { items: ProductRecords },
    Keyed(ProductMap),
}

impl ProductsPayload {
    fn into_map(self) -> ProductMap {
        let records = match self {
            Self::Bare(list) => ProductRecords::List(list),
            Self::Keyed(map) => ProductRecords::Keyed(map),
            Self::Data { data: records }
            | Self::Products { products: records }
            | Self::Items { items: records } => records,
        };

        match records {
            ProductRecords::List(list) => products_into_map(list),
            ProductRecords::Keyed(map) => map,
        }
    }
}

/// Key a list of records by their own `id`, `product_id` or `_id`.
///
/// Records without an identifier are skipped; a later record with the same
/// identifier replaces an earlier one.
pub fn products_into_map(records: impl IntoIterator<Item = RawProduct>) -> ProductMap {
    let mut map = ProductMap::new();

    for record in records {
        let Some(id) = record.id.clone() else {
            warn!(name = ?record.name, "skipping product record without an id");
            continue;
        };

        map.insert(id.into_key(), record);
    }

    map
}

/// Decode a JSON products payload.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if `text` is not a recognised payload.
pub fn decode_json(text: &str) -> Result<ProductMap, SourceError> {
    let payload: ProductsPayload = serde_json::from_str(text)?;

    Ok(payload.into_map())
}

/// Decode a YAML products payload.
///
/// # Errors
///
/// Returns [`SourceError::Yaml`] if `text` is not a recognised payload.
pub fn decode_yaml(text: &str) -> Result<ProductMap, SourceError> {
    let payload: ProductsPayload = serde_norway::from_str(text)?;

    Ok(payload.into_map())
}
