//! View state
//!
//! The parameters a shopper controls: category, search text, facet filters,
//! sort order and page.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    convert::Infallible,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{catalog::CatalogError, products::Product};

/// Category sentinel meaning "no category constraint".
pub const ALL_CATEGORIES: &str = "all";

/// Filterable product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Facet {
    /// Growing region
    Origin,

    /// Roast level
    Roast,

    /// Processing method
    Process,
}

impl Facet {
    /// Every facet, in pipeline order.
    pub const ALL: [Facet; 3] = [Facet::Origin, Facet::Roast, Facet::Process];

    /// Wire name of the facet.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Roast => "roast",
            Self::Process => "process",
        }
    }

    /// The product attribute this facet filters on.
    pub fn attribute(self, product: &Product) -> &str {
        match self {
            Self::Origin => &product.origin,
            Self::Roast => &product.roast_level,
            Self::Process => &product.process,
        }
    }
}

impl Display for Facet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin" => Ok(Self::Origin),
            "roast" => Ok(Self::Roast),
            "process" => Ok(Self::Process),
            other => Err(CatalogError::UnknownFacet(other.to_string())),
        }
    }
}

/// Sort order for the filtered products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Ascending by id
    #[default]
    Default,

    /// Cheapest first
    PriceLow,

    /// Most expensive first
    PriceHigh,

    /// Name, A to Z
    NameAsc,

    /// Name, Z to A
    NameDesc,

    /// Most expensive first; there is no popularity signal behind it
    Popular,
}

impl SortKey {
    /// Every sort key.
    pub const ALL: [SortKey; 6] = [
        SortKey::Default,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::Popular,
    ];

    /// Wire name of the sort key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::Popular => "popular",
        }
    }

    /// Compare two products under this sort key.
    pub fn compare(self, left: &Product, right: &Product) -> Ordering {
        match self {
            Self::Default => left.id.cmp(&right.id),
            Self::PriceLow => left.price.cmp(&right.price),
            Self::PriceHigh | Self::Popular => right.price.cmp(&left.price),
            Self::NameAsc => compare_names(&left.name, &right.name),
            Self::NameDesc => compare_names(&right.name, &left.name),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unknown names fall back to [`SortKey::Default`].
impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .unwrap_or_default())
    }
}

fn compare_names(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

/// Selected facet values.
///
/// Values within a facet are alternatives; facets combine with AND. A facet
/// with no selected values imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    values: BTreeMap<Facet, BTreeSet<String>>,
}

impl ActiveFilters {
    /// Toggle `value` in `facet`. Returns `true` if the value is now active.
    pub fn toggle(&mut self, facet: Facet, value: impl Into<String>) -> bool {
        let value = value.into();
        let selected = self.values.entry(facet).or_default();

        let active = if selected.remove(&value) {
            false
        } else {
            selected.insert(value)
        };

        if selected.is_empty() {
            self.values.remove(&facet);
        }

        active
    }

    /// Selected values for `facet`.
    pub fn values(&self, facet: Facet) -> impl Iterator<Item = &str> {
        self.values
            .get(&facet)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Whether `value` is selected in `facet`.
    pub fn is_active(&self, facet: Facet, value: &str) -> bool {
        self.values
            .get(&facet)
            .is_some_and(|selected| selected.contains(value))
    }

    /// Whether no facet has a selected value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `product` satisfies every constrained facet.
    pub fn matches(&self, product: &Product) -> bool {
        self.values
            .iter()
            .all(|(facet, selected)| selected.contains(facet.attribute(product)))
    }
}

/// View state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Selected category or [`ALL_CATEGORIES`]
    pub category: String,

    /// Lowercase, trimmed search query; empty matches everything
    pub search_text: String,

    /// Facet filters
    pub filters: ActiveFilters,

    /// Sort order
    pub sort: SortKey,

    /// Current page, 1-based
    pub page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search_text: String::new(),
            filters: ActiveFilters::default(),
            sort: SortKey::Default,
            page: 1,
        }
    }
}

impl ViewState {
    /// Whether `product` passes the category, search and facet filters.
    pub fn matches(&self, product: &Product) -> bool {
        (self.category == ALL_CATEGORIES || product.has_category(&self.category))
            && (self.search_text.is_empty() || product.search_string().contains(&self.search_text))
            && self.filters.matches(product)
    }

    /// Apply the filter and sort pipeline, returning positions into `products`.
    pub fn apply(&self, products: &[Product]) -> Vec<usize> {
        let mut positions: Vec<usize> = products
            .iter()
            .enumerate()
            .filter(|(_, product)| self.matches(product))
            .map(|(position, _)| position)
            .collect();

        positions.sort_by(|&left, &right| match (products.get(left), products.get(right)) {
            (Some(left), Some(right)) => self.sort.compare(left, right),
            _ => Ordering::Equal,
        });

        positions
    }
}
