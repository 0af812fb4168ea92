//! HTTP product source

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::{ProductSource, SourceError, decode_json};
use crate::products::ProductMap;

/// Products endpoint of a locally running storefront API.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api/products";

/// Fetches products from the storefront API.
#[derive(Debug, Clone)]
pub struct HttpProductSource {
    url: String,
    http: Client,
}

impl HttpProductSource {
    /// Create a source for the products endpoint at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }

    /// Use an existing client, e.g. one with custom timeouts.
    pub fn with_client(url: impl Into<String>, http: Client) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpProductSource {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn fetch_products(&self) -> Result<ProductMap, SourceError> {
        debug!(url = %self.url, "fetching products");

        let response = self.http.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let products = decode_json(&body)?;

        info!(url = %self.url, products = products.len(), "products fetched");

        Ok(products)
    }
}
