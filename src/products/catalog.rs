//! Catalog
//!
//! The immutable, id-indexed product collection every other component reads
//! from.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::products::{Product, ProductId, RawProduct};

/// Raw product mapping as supplied by a product source, keyed by whatever
/// identifier the source used.
pub type ProductMap = BTreeMap<String, RawProduct>;

/// Catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from a raw product mapping.
    ///
    /// Keys are coerced to integer ids; keys without a leading number are
    /// skipped, as are later duplicates of an id already seen. Products are
    /// stored in ascending id order.
    pub fn from_raw(map: ProductMap) -> Self {
        let mut products: Vec<Product> = Vec::with_capacity(map.len());
        let mut seen = FxHashSet::default();

        for (key, raw) in map {
            let Some(id) = coerce_product_id(&key) else {
                warn!(key = %key, "skipping product with non-numeric key");
                continue;
            };

            if !seen.insert(id) {
                warn!(key = %key, id = %id, "skipping duplicate product id");
                continue;
            }

            products.push(Product::from_raw(id, raw));
        }

        debug!(products = products.len(), "catalog built");

        Self::from_products(products)
    }

    /// Build a catalog from already normalised products.
    pub fn from_products(mut products: Vec<Product>) -> Self {
        products.sort_by_key(|product| product.id);
        products.dedup_by_key(|product| product.id);

        let index = products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id, position))
            .collect();

        Self { products, index }
    }

    /// All products, in ascending id order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|&position| self.products.get(position))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Coerce a source key into a product id by reading its leading digits.
///
/// Leading whitespace and a `+` sign are skipped, trailing text is ignored
/// (`"12"` and `" 12abc"` both give 12). Keys with no leading digits, or
/// whose digits overflow, yield `None`.
pub fn coerce_product_id(key: &str) -> Option<ProductId> {
    let trimmed = key.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let digits_len = unsigned
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    unsigned
        .get(..digits_len)
        .filter(|digits| !digits.is_empty())
        .and_then(|digits| digits.parse::<u64>().ok())
        .map(ProductId::new)
}
