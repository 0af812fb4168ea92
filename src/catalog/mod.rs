//! Catalog store
//!
//! Owns the loaded catalog and the shopper's view state. Every mutator ends
//! by recomputing the filtered product list, so `filtered` always equals the
//! category, search, facet and sort pipeline applied to the whole catalog.

use std::{num::NonZeroUsize, sync::Arc};

use thiserror::Error;
use tracing::debug;

use crate::products::{Catalog, Product, ProductId};

pub mod details;
pub mod pagination;
pub mod suggestions;
pub mod view;

pub use details::{PricedWeightOption, ProductDetails};
pub use pagination::{DEFAULT_PAGE_SIZE, MAX_VISIBLE_PAGES, Page};
pub use suggestions::{SearchHistory, Suggestion};
pub use view::{ALL_CATEGORIES, ActiveFilters, Facet, SortKey, ViewState};

/// Catalog store errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The facet name is not one of `origin`, `roast` or `process`.
    #[error("unknown filter facet: {0}")]
    UnknownFacet(String),
}

/// Catalog store
#[derive(Debug, Clone)]
pub struct CatalogStore {
    catalog: Arc<Catalog>,
    view: ViewState,
    page_size: NonZeroUsize,
    filtered: Vec<usize>,
    history: SearchHistory,
}

impl CatalogStore {
    /// Create a store over `catalog` with default view state.
    pub fn new(catalog: Arc<Catalog>, page_size: NonZeroUsize) -> Self {
        let mut store = Self {
            catalog,
            view: ViewState::default(),
            page_size,
            filtered: Vec::new(),
            history: SearchHistory::default(),
        };

        store.recompute();

        store
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Products per page.
    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Past searches, most recent first.
    pub fn search_history(&self) -> &SearchHistory {
        &self.history
    }

    /// Select a category, or [`ALL_CATEGORIES`] to clear the constraint.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.view.category = category.into();
        self.view.page = 1;
        self.recompute();
    }

    /// Search for `text`; it is trimmed and lowercased, and an empty query
    /// matches everything. Non-empty queries are remembered.
    pub fn set_search(&mut self, text: &str) {
        let search_text = text.trim().to_lowercase();

        if !search_text.is_empty() {
            self.history.record(search_text.clone());
        }

        self.view.search_text = search_text;
        self.view.page = 1;
        self.recompute();
    }

    /// Toggle `value` in `facet`. Returns `true` if the value is now active.
    pub fn toggle_facet(&mut self, facet: Facet, value: impl Into<String>) -> bool {
        let active = self.view.filters.toggle(facet, value);

        self.view.page = 1;
        self.recompute();

        active
    }

    /// Toggle a facet value by facet wire name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownFacet`] if `facet` is not a known facet
    /// name; the view state is left untouched.
    pub fn toggle_facet_named(
        &mut self,
        facet: &str,
        value: impl Into<String>,
    ) -> Result<bool, CatalogError> {
        let facet = facet.parse::<Facet>()?;

        Ok(self.toggle_facet(facet, value))
    }

    /// Change the sort order. The page is kept since the same products are
    /// only reordered.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.view.sort = sort;
        self.recompute();
    }

    /// Restore the default view.
    pub fn reset(&mut self) {
        self.view = ViewState::default();
        self.recompute();
    }

    /// Filtered, sorted products across all pages.
    pub fn filtered(&self) -> impl Iterator<Item = &Product> {
        let products = self.catalog.products();

        self.filtered
            .iter()
            .filter_map(move |&position| products.get(position))
    }

    /// Ids of the filtered products, in display order.
    pub fn filtered_ids(&self) -> Vec<ProductId> {
        self.filtered().map(|product| product.id).collect()
    }

    /// Number of filtered products.
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Number of pages for the current filters.
    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.filtered.len(), self.page_size.get())
    }

    /// Move to `page`. Pages outside `[1, total_pages]` are ignored.
    /// Returns `true` if the page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() || page == self.view.page {
            return false;
        }

        self.view.page = page;

        true
    }

    /// The current page.
    pub fn current_page(&self) -> Page<'_> {
        self.page(self.view.page)
    }

    /// Page `number`, clamped to the available pages.
    pub fn page(&self, number: usize) -> Page<'_> {
        let page_size = self.page_size.get();
        let total_items = self.filtered.len();
        let total_pages = pagination::total_pages(total_items, page_size);
        let number = pagination::clamp_page(number, total_pages);

        let products = self
            .filtered()
            .skip((number - 1) * page_size)
            .take(page_size)
            .collect();

        Page {
            products,
            number,
            total_pages,
            total_items,
            page_size,
            window: pagination::page_window(number, total_pages),
        }
    }

    /// Suggestions for a partially typed search.
    pub fn suggestions(&self, query: &str) -> Vec<Suggestion> {
        suggestions::suggestions(self.catalog.products(), &self.history, query)
    }

    /// Detail view for a product, if it exists.
    pub fn product_details(&self, id: ProductId) -> Option<ProductDetails<'_>> {
        self.catalog.get(id).map(ProductDetails::new)
    }

    fn recompute(&mut self) {
        self.filtered = self.view.apply(self.catalog.products());

        debug!(
            category = %self.view.category,
            search = %self.view.search_text,
            sort = %self.view.sort,
            matched = self.filtered.len(),
            total = self.catalog.len(),
            "catalog view recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::products::{ProductMap, RawCategory, RawProduct};

    use super::*;

    fn raw(name: &str, category: &str, price: i64, origin: &str) -> RawProduct {
        RawProduct {
            name: Some(name.to_string()),
            category: Some(RawCategory::One(category.to_string())),
            price: Some(Decimal::from(price)),
            origin: Some(origin.to_string()),
            ..RawProduct::default()
        }
    }

    /// Ten products; three are "robusta", the rest "arabica".
    fn store() -> CatalogStore {
        let map: ProductMap = (1..=10_u64)
            .map(|id| {
                let (category, origin) = if id % 3 == 0 {
                    ("robusta", "Lampung")
                } else {
                    ("arabica", "Aceh")
                };

                let price = i64::try_from(id).unwrap_or_default() * 10_000;

                (id.to_string(), raw(&format!("Kopi {id:02}"), category, price, origin))
            })
            .collect();

        CatalogStore::new(Arc::new(Catalog::from_raw(map)), DEFAULT_PAGE_SIZE)
    }

    fn ids(products: &[&Product]) -> Vec<u64> {
        products.iter().map(|product| product.id.get()).collect()
    }

    #[test]
    fn starts_with_every_product_in_id_order() {
        let store = store();

        assert_eq!(store.filtered_len(), 10);
        assert_eq!(
            store.filtered_ids(),
            (1..=10).map(ProductId::new).collect::<Vec<_>>()
        );
    }

    #[test]
    fn pages_slice_the_filtered_list() {
        let store = store();

        let first = store.page(1);
        let second = store.page(2);

        assert_eq!(ids(&first.products), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(ids(&second.products), [9, 10]);
        assert_eq!(first.total_pages, 2);
        assert_eq!(second.first_position(), 9);
        assert_eq!(second.last_position(), 10);
    }

    #[test]
    fn page_number_is_clamped() {
        let store = store();

        assert_eq!(store.page(0).number, 1);
        assert_eq!(store.page(7).number, 2);
    }

    #[test]
    fn category_resets_page_and_filters() {
        let mut store = store();

        assert!(store.go_to_page(2));

        store.set_category("robusta");

        assert_eq!(store.view().page, 1);
        assert_eq!(store.filtered_len(), 3);
        assert_eq!(
            store.filtered_ids(),
            [3, 6, 9].map(ProductId::new).to_vec()
        );
    }

    #[test]
    fn unmatched_category_yields_empty_list() {
        let mut store = store();

        store.set_category("decaf");

        let page = store.current_page();

        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(page.products.is_empty());
    }

    #[test]
    fn search_is_trimmed_and_lowercased() {
        let mut store = store();

        store.set_search("  KOPI 07 ");

        assert_eq!(store.view().search_text, "kopi 07");
        assert_eq!(store.filtered_ids(), [ProductId::new(7)]);
        assert_eq!(store.search_history().iter().next(), Some("kopi 07"));
    }

    #[test]
    fn empty_search_matches_everything() {
        let mut store = store();

        store.set_search("kopi 07");
        store.set_search("   ");

        assert_eq!(store.filtered_len(), 10);
        assert_eq!(store.search_history().len(), 1);
    }

    #[test]
    fn search_resets_page() {
        let mut store = store();
        assert!(store.go_to_page(2));

        store.set_search("kopi");

        assert_eq!(store.view().page, 1);
        assert_eq!(store.filtered_len(), 10);
    }

    #[test]
    fn facet_toggle_resets_page() {
        let mut store = store();
        assert!(store.go_to_page(2));

        store.toggle_facet(Facet::Origin, "Aceh");

        assert_eq!(store.view().page, 1);
    }

    #[test]
    fn facet_toggle_is_reversible() {
        let mut store = store();
        let before = store.view().filters.clone();

        assert!(store.toggle_facet(Facet::Origin, "Lampung"));
        assert_eq!(store.filtered_len(), 3);

        assert!(!store.toggle_facet(Facet::Origin, "Lampung"));
        assert_eq!(store.view().filters, before);
        assert_eq!(store.filtered_len(), 10);
    }

    #[test]
    fn unknown_facet_name_is_rejected_without_change() {
        let mut store = store();
        assert!(store.go_to_page(2));

        let result = store.toggle_facet_named("altitude", "1500");

        assert_eq!(
            result,
            Err(CatalogError::UnknownFacet("altitude".to_string()))
        );
        assert_eq!(store.view().page, 2);
        assert!(store.view().filters.is_empty());
    }

    #[test]
    fn named_facet_toggles() -> TestResult {
        let mut store = store();

        assert!(store.toggle_facet_named("origin", "Aceh")?);
        assert_eq!(store.filtered_len(), 7);

        Ok(())
    }

    #[test]
    fn sort_keeps_page() {
        let mut store = store();
        assert!(store.go_to_page(2));

        store.set_sort(SortKey::PriceHigh);

        assert_eq!(store.view().page, 2);
        assert_eq!(ids(&store.current_page().products), [2, 1]);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut store = store();
        store.set_category("arabica");
        store.set_sort(SortKey::NameDesc);

        let first = store.filtered_ids();
        store.recompute();

        assert_eq!(store.filtered_ids(), first);
    }

    #[test]
    fn reset_returns_to_first_page() {
        let mut store = store();
        assert!(store.go_to_page(2));

        store.reset();

        assert_eq!(store.view().page, 1);
        assert_eq!(ids(&store.current_page().products), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = store();
        store.set_category("robusta");
        store.set_search("kopi");
        store.toggle_facet(Facet::Origin, "Lampung");
        store.set_sort(SortKey::NameDesc);

        store.reset();

        assert_eq!(store.view(), &ViewState::default());
        assert_eq!(store.filtered_len(), 10);
    }

    #[test]
    fn go_to_page_ignores_out_of_range() {
        let mut store = store();

        assert!(!store.go_to_page(0));
        assert!(!store.go_to_page(3));
        assert!(!store.go_to_page(1));
        assert_eq!(store.view().page, 1);
    }

    #[test]
    fn details_for_unknown_product_are_none() {
        let store = store();

        assert!(store.product_details(ProductId::new(42)).is_none());
        assert!(store.product_details(ProductId::new(4)).is_some());
    }
}
