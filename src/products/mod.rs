//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub mod catalog;
pub mod raw;

pub use catalog::{Catalog, ProductMap, coerce_product_id};
pub use raw::{RawBadge, RawCategory, RawId, RawProduct, RawWeightOption};

/// Image shown for products whose record carries no image.
pub const DEFAULT_PRODUCT_IMAGE: &str = "/img/no-image.png";

/// Product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw integer identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw integer identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Whether a product is sold as green (unroasted) or roasted beans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BeanType {
    /// Unroasted beans.
    GreenBean,

    /// Roasted beans; anything not explicitly green is treated as roasted.
    #[default]
    RoastedBean,
}

impl BeanType {
    /// Interpret the free-form `type` field of a product record.
    pub fn from_raw(value: Option<&str>) -> Self {
        match value {
            Some("green-bean") => Self::GreenBean,
            _ => Self::RoastedBean,
        }
    }

    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::GreenBean => "Green Beans",
            Self::RoastedBean => "Roasted Beans",
        }
    }
}

/// Decorative product badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Badge text
    pub text: String,

    /// Style class used by the rendering layer
    pub class: String,
}

/// A purchasable weight variant of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightOption {
    /// Weight in grams
    pub value: u32,

    /// Display label (e.g. "250g")
    pub label: String,

    /// Multiplier applied to the base price, never negative
    pub price_multiplier: Decimal,
}

/// Product
///
/// Products are immutable once they enter a [`Catalog`]; the search string is
/// derived from the other fields exactly once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product description
    pub description: String,

    /// Category tags, in source order
    pub category: SmallVec<[String; 5]>,

    /// Base price in whole rupiah
    pub price: u64,

    /// Origin facet
    pub origin: String,

    /// Roast level facet
    pub roast_level: String,

    /// Processing method facet
    pub process: String,

    /// Decorative badges
    pub badges: Vec<Badge>,

    /// Specification lines
    pub specs: Vec<String>,

    /// Weight variants
    pub weight_options: Vec<WeightOption>,

    /// Unit price caption (e.g. "per kg")
    pub price_per: String,

    /// Image path or URL
    pub image: String,

    /// Green or roasted beans
    pub bean_type: BeanType,

    /// Units in stock
    pub stock: u64,

    /// Whether the product is currently sold
    pub is_available: bool,

    category_string: String,
    search_string: String,
}

impl Product {
    /// Normalise a raw record into a product with the given identifier.
    pub fn from_raw(id: ProductId, raw: RawProduct) -> Self {
        let category: SmallVec<[String; 5]> = raw
            .category
            .map(RawCategory::into_tags)
            .unwrap_or_default();

        let badges = raw
            .badges
            .unwrap_or_default()
            .into_iter()
            .filter_map(RawBadge::into_badge)
            .collect();

        let weight_options = raw
            .weight_options
            .unwrap_or_default()
            .into_iter()
            .map(RawWeightOption::into_option)
            .collect();

        let image = raw
            .image_url
            .filter(|url| !url.is_empty())
            .or(raw.image.filter(|image| !image.is_empty()))
            .unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_string());

        let mut product = Self {
            id,
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            category_string: category.join(" "),
            category,
            price: raw.price.map_or(0, round_price),
            origin: raw.origin.unwrap_or_default(),
            roast_level: raw.roast_level.unwrap_or_default(),
            process: raw.process.unwrap_or_default(),
            badges,
            specs: raw.specs.unwrap_or_default(),
            weight_options,
            price_per: raw.price_per.unwrap_or_default(),
            image,
            bean_type: BeanType::from_raw(raw.bean_type.as_deref()),
            stock: raw.stock.unwrap_or_default(),
            is_available: raw.is_available.unwrap_or(true),
            search_string: String::new(),
        };

        product.search_string = product.build_search_string();

        product
    }

    /// Space-joined category tags.
    pub fn category_string(&self) -> &str {
        &self.category_string
    }

    /// Lowercase text used for substring search.
    pub fn search_string(&self) -> &str {
        &self.search_string
    }

    /// Whether the product carries the given category tag.
    pub fn has_category(&self, category: &str) -> bool {
        self.category.iter().any(|tag| tag == category)
    }

    /// Find the weight option for the given weight in grams.
    pub fn weight_option(&self, grams: u32) -> Option<&WeightOption> {
        self.weight_options
            .iter()
            .find(|option| option.value == grams)
    }

    /// Price of one unit at the given weight.
    ///
    /// Unknown weights fall back to a multiplier of one.
    pub fn price_for_weight(&self, grams: u32) -> u64 {
        let multiplier = self
            .weight_option(grams)
            .map_or(Decimal::ONE, |option| option.price_multiplier);

        Decimal::from(self.price)
            .checked_mul(multiplier)
            .map_or(u64::MAX, round_price)
    }

    fn build_search_string(&self) -> String {
        let mut parts = vec![self.name.as_str(), self.description.as_str()];

        parts.extend(self.category.iter().map(String::as_str));
        parts.extend(self.badges.iter().map(|badge| badge.text.as_str()));
        parts.extend([
            self.origin.as_str(),
            self.roast_level.as_str(),
            self.process.as_str(),
        ]);
        parts.extend(self.specs.iter().map(String::as_str));

        parts.join(" ").to_lowercase()
    }
}

/// Round a decimal amount to whole rupiah, half away from zero.
///
/// Negative amounts clamp to zero.
pub fn round_price(amount: Decimal) -> u64 {
    if amount.is_sign_negative() {
        return 0;
    }

    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}
