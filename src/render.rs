//! Plain-text rendering
//!
//! Tables for the terminal front end. Every writer takes any [`io::Write`] so
//! output can be captured in tests.

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::{CartLineItem, CartTotals, OrderConfirmation},
    catalog::{Page, ProductDetails, Suggestion},
    format::format_rupiah,
};

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Write one page of products with a results summary and page selector.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the output cannot be written.
pub fn write_product_page(mut out: impl io::Write, page: &Page<'_>) -> Result<(), RenderError> {
    if page.is_empty() {
        writeln!(out, "No products found")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Category", "Origin", "Roast", "Price"]);

    for product in &page.products {
        let price = if product.price_per.is_empty() {
            format_rupiah(product.price)
        } else {
            format!("{} / {}", format_rupiah(product.price), product.price_per)
        };

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category_string().to_string(),
            product.origin.clone(),
            product.roast_level.clone(),
            price,
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(5..6), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(
        out,
        "Showing {}-{} of {} products",
        page.first_position(),
        page.last_position(),
        page.total_items
    )?;

    if page.needs_selector() {
        writeln!(out, "{}", page_selector(page))?;
    }

    Ok(())
}

fn page_selector(page: &Page<'_>) -> String {
    let mut parts = Vec::new();

    if page.has_previous() {
        parts.push("<".to_string());
    }

    for number in page.window.clone() {
        if number == page.number {
            parts.push(format!("[{number}]"));
        } else {
            parts.push(number.to_string());
        }
    }

    if page.has_next() {
        parts.push(">".to_string());
    }

    parts.join(" ")
}

/// Write the detail view of one product.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the output cannot be written.
pub fn write_product_details(
    mut out: impl io::Write,
    details: &ProductDetails<'_>,
) -> Result<(), RenderError> {
    let product = details.product;

    writeln!(out, "{} ({})", product.name, product.bean_type.label())?;

    if !product.description.is_empty() {
        writeln!(out, "{}", product.description)?;
    }

    let mut builder = Builder::default();

    builder.push_record(["Price".to_string(), details.price_label()]);

    for (label, value) in [
        ("Category", product.category_string()),
        ("Origin", product.origin.as_str()),
        ("Roast", product.roast_level.as_str()),
        ("Process", product.process.as_str()),
    ] {
        if !value.is_empty() {
            builder.push_record([label, value]);
        }
    }

    builder.push_record(["Stock".to_string(), product.stock.to_string()]);

    for spec in &product.specs {
        builder.push_record(["Spec", spec.as_str()]);
    }

    for option in &details.weight_options {
        builder.push_record(["Weight".to_string(), option.label()]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write the cart lines and totals.
///
/// Line numbers are 1-based, matching what the cart commands accept.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the output cannot be written.
pub fn write_cart(
    mut out: impl io::Write,
    lines: &[CartLineItem],
    totals: &CartTotals,
) -> Result<(), RenderError> {
    if lines.is_empty() {
        writeln!(out, "Your cart is empty")?;
        writeln!(out, "Total: {}", format_rupiah(totals.total))?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Weight", "Qty", "Unit Price", "Line Total"]);

    for (position, line) in lines.iter().enumerate() {
        builder.push_record([
            (position + 1).to_string(),
            line.name.clone(),
            line.weight_label(),
            line.quantity.to_string(),
            format_rupiah(line.unit_price),
            format_rupiah(line.line_total()),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, "Items:    {}", totals.item_count)?;
    writeln!(out, "Subtotal: {}", format_rupiah(totals.subtotal))?;
    writeln!(out, "Shipping: {}", format_rupiah(totals.shipping))?;
    writeln!(out, "Total:    {}", format_rupiah(totals.total))?;

    Ok(())
}

/// Write search suggestions, one per line.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the output cannot be written.
pub fn write_suggestions(
    mut out: impl io::Write,
    suggestions: &[Suggestion],
) -> Result<(), RenderError> {
    for suggestion in suggestions {
        writeln!(out, "{suggestion}")?;
    }

    Ok(())
}

/// Write an order confirmation.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the output cannot be written.
pub fn write_order_confirmation(
    mut out: impl io::Write,
    confirmation: &OrderConfirmation,
) -> Result<(), RenderError> {
    writeln!(out, "Order placed: {}", confirmation.order_number)?;
    writeln!(out, "Items: {}", confirmation.item_count)?;
    writeln!(out, "Total: {}", format_rupiah(confirmation.total))?;

    Ok(())
}
