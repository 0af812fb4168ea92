//! Kopi Prima
//!
//! Catalog browsing and cart bookkeeping for the Kopi Prima coffee storefront:
//! filtering, sorting and paging a product catalog, and a persistent cart with
//! a guarded checkout.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod format;
pub mod prelude;
pub mod products;
pub mod render;
pub mod settings;
pub mod sources;
pub mod storage;
pub mod storefront;
