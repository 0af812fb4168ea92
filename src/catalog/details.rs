//! Product details

use crate::{
    format::format_rupiah,
    products::{Product, WeightOption},
};

/// Weight option with its resolved unit price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedWeightOption<'a> {
    /// The weight option
    pub option: &'a WeightOption,

    /// Unit price at this weight
    pub price: u64,
}

impl PricedWeightOption<'_> {
    /// Selector label, e.g. `250g - Rp 30.000`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.option.label, format_rupiah(self.price))
    }
}

/// Everything the product detail view shows for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails<'a> {
    /// The product
    pub product: &'a Product,

    /// Weight options with prices, in source order
    pub weight_options: Vec<PricedWeightOption<'a>>,
}

impl<'a> ProductDetails<'a> {
    /// Resolve the detail view for `product`.
    pub fn new(product: &'a Product) -> Self {
        let weight_options = product
            .weight_options
            .iter()
            .map(|option| PricedWeightOption {
                option,
                price: product.price_for_weight(option.value),
            })
            .collect();

        Self {
            product,
            weight_options,
        }
    }

    /// Formatted base price.
    pub fn price_label(&self) -> String {
        format_rupiah(self.product.price)
    }
}
