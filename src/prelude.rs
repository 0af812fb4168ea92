//! Kopi Prima prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    auth::{AuthError, AuthService, StoredSession},
    cart::{
        CartError, CartLedger, CartLineItem, CartTotals, CheckoutError, OrderConfirmation,
        OrderNumber, PendingCheckout,
    },
    catalog::{
        ActiveFilters, CatalogError, CatalogStore, Facet, Page, ProductDetails, SortKey,
        Suggestion, ViewState,
    },
    products::{BeanType, Catalog, Product, ProductId, ProductMap, RawProduct},
    settings::StorefrontSettings,
    sources::{FixtureProductSource, HttpProductSource, ProductSource, SourceError},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
    storefront::{CatalogState, Storefront, StorefrontError},
};
