//! Cart totals

use super::CartLineItem;

/// Flat shipping charge in whole rupiah.
pub const DEFAULT_SHIPPING_COST: u64 = 15_000;

/// Cart totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of line totals
    pub subtotal: u64,

    /// Shipping charge
    pub shipping: u64,

    /// `subtotal + shipping`
    pub total: u64,

    /// Number of lines
    pub line_count: usize,

    /// Sum of quantities
    pub item_count: u64,
}

impl CartTotals {
    /// Compute totals for `lines` with a flat `shipping` charge.
    pub fn from_lines(lines: &[CartLineItem], shipping: u64) -> Self {
        let subtotal = lines
            .iter()
            .map(CartLineItem::line_total)
            .fold(0_u64, u64::saturating_add);

        let item_count = lines.iter().map(|line| u64::from(line.quantity)).sum();

        Self {
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping),
            line_count: lines.len(),
            item_count,
        }
    }
}
