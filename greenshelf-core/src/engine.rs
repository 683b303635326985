//! Filter/sort engine
//!
//! A pure function from `(products, search term, filter spec, sort mode)`
//! to the ordered visible list. No hidden state: identical inputs always
//! produce an identical ordering, with the product id as a stable tie-break
//! under every sort mode.

use shared::{FilterSpec, Product, SortMode};
use std::cmp::Ordering;

/// True when the product passes the search term and every active filter
///
/// The search is a case-insensitive substring match against the name or
/// the category; an empty term matches everything.
pub fn matches(product: &Product, search: &str, filter: &FilterSpec) -> bool {
    if !search.is_empty() {
        let term = search.to_lowercase();
        let in_name = product.name.to_lowercase().contains(&term);
        let in_category = product.category.to_lowercase().contains(&term);
        if !in_name && !in_category {
            return false;
        }
    }
    filter.matches(product)
}

/// Derive the ordered visible product list
pub fn filter_and_sort(
    products: &[Product],
    search: &str,
    filter: &FilterSpec,
    sort: SortMode,
) -> Vec<Product> {
    let mut visible: Vec<Product> = products
        .iter()
        .filter(|p| matches(p, search, filter))
        .cloned()
        .collect();

    visible.sort_by(|a, b| compare(a, b, sort).then_with(|| a.product_id.cmp(&b.product_id)));
    visible
}

fn compare(a: &Product, b: &Product, sort: SortMode) -> Ordering {
    match sort {
        SortMode::Urgency => b.urgency_score.total_cmp(&a.urgency_score),
        SortMode::PriceLow => a.effective_price().total_cmp(&b.effective_price()),
        SortMode::PriceHigh => b.effective_price().total_cmp(&a.effective_price()),
        SortMode::Stock => a.stock.cmp(&b.stock),
        SortMode::Discount => b.discount.total_cmp(&a.discount),
        SortMode::Name => a.name.cmp(&b.name),
    }
}
