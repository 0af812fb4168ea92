//! Raw product records
//!
//! The shape a product takes on the wire, before normalisation. Every field is
//! optional and several carry the alternative names the storefront API has
//! used over time.

use rust_decimal::Decimal;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::products::{Badge, WeightOption};

/// Identifier as sent by the source: either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Numeric identifier
    Number(u64),

    /// Textual identifier
    Text(String),
}

impl RawId {
    /// The identifier as a mapping key.
    pub fn into_key(self) -> String {
        match self {
            Self::Number(id) => id.to_string(),
            Self::Text(id) => id,
        }
    }
}

/// Category field: either a single tag or a list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawCategory {
    /// A bare tag
    One(String),

    /// A list of tags
    Many(Vec<String>),
}

impl RawCategory {
    /// Normalise into a tag list; an empty scalar means no tags.
    pub fn into_tags(self) -> SmallVec<[String; 5]> {
        match self {
            Self::One(tag) if tag.is_empty() => SmallVec::new(),
            Self::One(tag) => SmallVec::from_iter([tag]),
            Self::Many(tags) => tags.into_iter().collect(),
        }
    }
}

/// Raw badge
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawBadge {
    /// Badge text
    pub text: Option<String>,

    /// Style class
    pub class: Option<String>,
}

impl RawBadge {
    /// Badges without text carry nothing to show or search and are dropped.
    pub fn into_badge(self) -> Option<Badge> {
        let text = self.text.filter(|text| !text.is_empty())?;

        Some(Badge {
            text,
            class: self.class.unwrap_or_default(),
        })
    }
}

/// Raw weight option
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawWeightOption {
    /// Weight in grams
    pub value: u32,

    /// Display label
    pub label: Option<String>,

    /// Price multiplier
    #[serde(rename = "priceMultiplier", alias = "price_multiplier")]
    pub price_multiplier: Option<Decimal>,
}

impl RawWeightOption {
    /// Normalise into a weight option. Missing multipliers mean one and
    /// negative multipliers clamp to zero.
    pub fn into_option(self) -> WeightOption {
        let price_multiplier = self
            .price_multiplier
            .unwrap_or(Decimal::ONE)
            .max(Decimal::ZERO);

        WeightOption {
            label: self.label.unwrap_or_else(|| format!("{}g", self.value)),
            value: self.value,
            price_multiplier,
        }
    }
}

/// Raw product record
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawProduct {
    /// Identifier, when the record carries its own
    #[serde(alias = "product_id", alias = "_id")]
    pub id: Option<RawId>,

    /// Product name
    #[serde(alias = "title")]
    pub name: Option<String>,

    /// Description
    #[serde(alias = "short_description")]
    pub description: Option<String>,

    /// Category tag or tags
    pub category: Option<RawCategory>,

    /// Base price; integers, decimals and decimal strings are accepted
    pub price: Option<Decimal>,

    /// Units in stock
    #[serde(alias = "quantity")]
    pub stock: Option<u64>,

    /// Availability flag
    #[serde(alias = "available", alias = "isAvailable")]
    pub is_available: Option<bool>,

    /// Decorative badges
    pub badges: Option<Vec<RawBadge>>,

    /// Specification lines
    #[serde(alias = "specification", alias = "specifications")]
    pub specs: Option<Vec<String>>,

    /// Weight variants
    #[serde(rename = "weightOptions", alias = "weight_options")]
    pub weight_options: Option<Vec<RawWeightOption>>,

    /// Unit price caption
    #[serde(rename = "pricePer", alias = "price_per")]
    pub price_per: Option<String>,

    /// Origin facet
    pub origin: Option<String>,

    /// Roast level facet
    #[serde(rename = "roastLevel", alias = "roast_level")]
    pub roast_level: Option<String>,

    /// Processing facet
    pub process: Option<String>,

    /// Preferred image URL
    pub image_url: Option<String>,

    /// Fallback image path
    pub image: Option<String>,

    /// Bean type (`green-bean` or `roasted-bean`)
    #[serde(rename = "type")]
    pub bean_type: Option<String>,
}
