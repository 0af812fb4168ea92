//! Storefront settings

use std::{num::NonZeroUsize, time::Duration};

use crate::{
    cart::{DEFAULT_CHECKOUT_DELAY, DEFAULT_SHIPPING_COST},
    catalog::DEFAULT_PAGE_SIZE,
};

/// Tunables for a [`Storefront`](crate::storefront::Storefront).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorefrontSettings {
    /// Products per catalog page
    pub page_size: NonZeroUsize,

    /// Flat shipping charge in whole rupiah
    pub shipping_cost: u64,

    /// Pause between accepting a checkout and placing the order
    pub checkout_delay: Duration,
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            shipping_cost: DEFAULT_SHIPPING_COST,
            checkout_delay: DEFAULT_CHECKOUT_DELAY,
        }
    }
}
