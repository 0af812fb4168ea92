//! Search history and suggestions

use std::{
    collections::VecDeque,
    fmt::{Display, Formatter, Result as FmtResult},
};

use crate::{format::capitalize, products::Product};

/// Number of past searches remembered.
pub const SEARCH_HISTORY_LIMIT: usize = 5;

/// Most suggestions offered for one query.
pub const MAX_SUGGESTIONS: usize = 8;

/// Shortest query, in characters, that produces suggestions.
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Terms always offered when they match the query.
pub const POPULAR_TERMS: [&str; 7] = [
    "gayo",
    "toraja",
    "luwak",
    "espresso",
    "arabica",
    "robusta",
    "specialty",
];

/// Recent non-empty searches, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    terms: VecDeque<String>,
}

impl SearchHistory {
    /// Record a search, dropping the oldest once the limit is exceeded.
    pub fn record(&mut self, term: impl Into<String>) {
        self.terms.push_front(term.into());
        self.terms.truncate(SEARCH_HISTORY_LIMIT);
    }

    /// Past searches, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Number of remembered searches.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether nothing has been searched yet.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// A search suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// Text found in the catalog or the popular terms
    Term(String),

    /// A previous search
    History(String),
}

impl Suggestion {
    /// The text to search for when the suggestion is picked.
    pub fn text(&self) -> &str {
        match self {
            Self::Term(text) | Self::History(text) => text,
        }
    }
}

impl Display for Suggestion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Term(text) => f.write_str(text),
            Self::History(text) => write!(f, "🔍 {text}"),
        }
    }
}

/// Suggestions for a partially typed query.
///
/// Sources, in order: product names, categories (capitalised), badge texts,
/// past searches, then popular terms (capitalised). Duplicates are dropped
/// and at most [`MAX_SUGGESTIONS`] are returned.
pub fn suggestions<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    history: &SearchHistory,
    query: &str,
) -> Vec<Suggestion> {
    let query = query.trim().to_lowercase();

    if query.chars().count() < MIN_SUGGESTION_QUERY_CHARS {
        return Vec::new();
    }

    let mut found: Vec<Suggestion> = Vec::new();
    let mut push = |suggestion: Suggestion| {
        if !found.contains(&suggestion) {
            found.push(suggestion);
        }
    };

    for product in products {
        if product.name.to_lowercase().contains(&query) {
            push(Suggestion::Term(product.name.clone()));
        }

        for category in &product.category {
            if category.to_lowercase().contains(&query) {
                push(Suggestion::Term(capitalize(category)));
            }
        }

        for badge in &product.badges {
            if badge.text.to_lowercase().contains(&query) {
                push(Suggestion::Term(badge.text.clone()));
            }
        }
    }

    for term in history.iter().filter(|term| term.contains(&query)) {
        push(Suggestion::History(term.to_string()));
    }

    for term in POPULAR_TERMS.iter().filter(|term| term.contains(&query)) {
        push(Suggestion::Term(capitalize(term)));
    }

    found.truncate(MAX_SUGGESTIONS);

    found
}
