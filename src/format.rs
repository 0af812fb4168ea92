//! Display formatting in the storefront's Indonesian conventions.

use rust_decimal::Decimal;

/// Format a whole-rupiah amount, e.g. `Rp 1.250.000`.
pub fn format_rupiah(amount: u64) -> String {
    format!("Rp {}", group_thousands(amount))
}

/// Group digits in threes with `.` separators, e.g. `15.000`.
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push('.');
        }

        grouped.push(digit);
    }

    grouped
}

/// Weight label for a cart line: grams below a kilogram, kilograms from there.
pub fn weight_label(grams: u32) -> String {
    if grams < 1000 {
        return format!("{grams}g");
    }

    let kilograms = (Decimal::from(grams) / Decimal::ONE_THOUSAND).normalize();

    format!("{kilograms}kg")
}

/// Uppercase the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
