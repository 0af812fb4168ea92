//! Cart line items

use serde::{Deserialize, Serialize};

use crate::{
    format::weight_label,
    products::{BeanType, ProductId},
};

/// One product at one weight in the cart.
///
/// The unit price is captured when the line is created and does not follow
/// later catalog changes. Field names on the wire match what the storefront
/// pages already keep in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product the line refers to
    #[serde(rename = "id")]
    pub product_id: ProductId,

    /// Product name at the time of adding
    #[serde(default)]
    pub name: String,

    /// Unit price in whole rupiah, multiplier already applied
    #[serde(rename = "price")]
    pub unit_price: u64,

    /// Selected weight in grams
    #[serde(rename = "weight")]
    pub weight_grams: u32,

    /// Number of units, at least one
    pub quantity: u32,

    /// Product image
    #[serde(default)]
    pub image: String,

    /// Green or roasted beans
    #[serde(rename = "type", default)]
    pub bean_type: BeanType,
}

impl CartLineItem {
    /// `unit_price * quantity`, saturating.
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }

    /// Merge key; two adds with the same key land on the same line.
    pub fn key(&self) -> (ProductId, u32) {
        (self.product_id, self.weight_grams)
    }

    /// Human readable weight, e.g. `250g` or `1kg`.
    pub fn weight_label(&self) -> String {
        weight_label(self.weight_grams)
    }
}
