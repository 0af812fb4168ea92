//! Storefront
//!
//! Ties a catalog, once loaded, to the shopper's cart.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::AuthService,
    cart::{CartError, CartLedger, CartLineItem, CheckoutError, OrderConfirmation},
    catalog::{CatalogError, CatalogStore},
    products::{Catalog, ProductId},
    settings::StorefrontSettings,
    sources::ProductSource,
    storage::KeyValueStore,
};

/// Storefront errors
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The catalog has not been loaded yet.
    #[error("catalog not loaded")]
    CatalogNotLoaded,

    /// A cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout was refused or failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// A catalog view operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Whether the catalog has been fetched.
///
/// A fetch that failed leaves a loaded, empty catalog; only a storefront that
/// never fetched is [`CatalogState::NotLoaded`].
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    /// No fetch has completed
    #[default]
    NotLoaded,

    /// Fetched, possibly empty
    Loaded(CatalogStore),
}

/// Storefront
#[derive(Debug)]
pub struct Storefront<S> {
    catalog: CatalogState,
    cart: CartLedger<S>,
    settings: StorefrontSettings,
}

impl<S: KeyValueStore> Storefront<S> {
    /// Create a storefront persisting its cart in `store`. The saved cart is
    /// restored immediately; the catalog waits for [`Storefront::load`].
    pub fn new(store: S, settings: StorefrontSettings) -> Self {
        Self {
            catalog: CatalogState::NotLoaded,
            cart: CartLedger::new(store, settings.shipping_cost),
            settings,
        }
    }

    /// Settings in effect.
    pub fn settings(&self) -> &StorefrontSettings {
        &self.settings
    }

    /// Fetch the catalog from `source`. A failed fetch is logged and leaves an
    /// empty catalog.
    pub async fn load<P>(&mut self, source: &P)
    where
        P: ProductSource + ?Sized,
    {
        let catalog = match source.fetch_products().await {
            Ok(products) => Catalog::from_raw(products),
            Err(error) => {
                warn!(%error, "product source unavailable, showing an empty catalog");
                Catalog::empty()
            }
        };

        info!(products = catalog.len(), "catalog loaded");

        self.install(catalog);
    }

    /// Use an already built catalog.
    pub fn install(&mut self, catalog: Catalog) {
        let store = CatalogStore::new(Arc::new(catalog), self.settings.page_size);

        self.catalog = CatalogState::Loaded(store);
    }

    /// Whether a catalog fetch has completed.
    pub fn is_loaded(&self) -> bool {
        matches!(self.catalog, CatalogState::Loaded(_))
    }

    /// The catalog store.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::CatalogNotLoaded`] before the first load.
    pub fn catalog(&self) -> Result<&CatalogStore, StorefrontError> {
        match &self.catalog {
            CatalogState::Loaded(store) => Ok(store),
            CatalogState::NotLoaded => Err(StorefrontError::CatalogNotLoaded),
        }
    }

    /// The catalog store, for changing the view.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::CatalogNotLoaded`] before the first load.
    pub fn catalog_mut(&mut self) -> Result<&mut CatalogStore, StorefrontError> {
        match &mut self.catalog {
            CatalogState::Loaded(store) => Ok(store),
            CatalogState::NotLoaded => Err(StorefrontError::CatalogNotLoaded),
        }
    }

    /// The cart.
    pub fn cart(&self) -> &CartLedger<S> {
        &self.cart
    }

    /// The cart, for line edits.
    pub fn cart_mut(&mut self) -> &mut CartLedger<S> {
        &mut self.cart
    }

    /// Add one unit of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::CatalogNotLoaded`] before the first load, or
    /// the cart's error if the product is unknown or the cart cannot be saved.
    pub fn add_to_cart(
        &mut self,
        product_id: ProductId,
        weight_grams: u32,
    ) -> Result<CartLineItem, StorefrontError> {
        self.add_to_cart_quantity(product_id, weight_grams, 1)
    }

    /// Add several units of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// As [`Storefront::add_to_cart`].
    pub fn add_to_cart_quantity(
        &mut self,
        product_id: ProductId,
        weight_grams: u32,
        quantity: u32,
    ) -> Result<CartLineItem, StorefrontError> {
        let CatalogState::Loaded(store) = &self.catalog else {
            return Err(StorefrontError::CatalogNotLoaded);
        };

        let line = self
            .cart
            .add_quantity(store.catalog(), product_id, weight_grams, quantity)?;

        Ok(line)
    }

    /// Check out with the configured delay.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Checkout`] if the checkout is refused or the
    /// emptied cart cannot be saved.
    pub async fn checkout<A>(&mut self, auth: &A) -> Result<OrderConfirmation, StorefrontError>
    where
        A: AuthService + ?Sized,
    {
        let confirmation = self
            .cart
            .checkout(auth, self.settings.checkout_delay)
            .await?;

        Ok(confirmation)
    }
}
