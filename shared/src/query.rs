//! Filter and sort specifications
//!
//! These live only as UI state; "clear filters" recreates the default and
//! nothing here is persisted across sessions.

use crate::models::URGENT_EXPIRY_DAYS;
use crate::Product;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stock-level bands used by the sidebar filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl StockLevel {
    pub fn contains(&self, stock: u32) -> bool {
        match self {
            StockLevel::All => true,
            StockLevel::Low => stock < 10,
            StockLevel::Medium => (10..50).contains(&stock),
            StockLevel::High => stock >= 50,
        }
    }
}

/// Visible-list filter specification
///
/// The default spec matches everything. Categories use a `BTreeSet` so the
/// spec itself has a deterministic representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Empty = no category restriction
    pub categories: BTreeSet<String>,
    /// Inclusive [min, max] on the base price
    pub price_range: (f64, f64),
    pub discount_only: bool,
    /// `days_to_expiry <= 7`
    pub urgent_only: bool,
    pub stock_level: StockLevel,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            categories: BTreeSet::new(),
            price_range: (0.0, f64::MAX),
            discount_only: false,
            urgent_only: false,
            stock_level: StockLevel::All,
        }
    }
}

impl FilterSpec {
    /// True when the product passes every active filter
    pub fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }
        if product.price < self.price_range.0 || product.price > self.price_range.1 {
            return false;
        }
        if self.discount_only && product.discount <= 0.0 {
            return false;
        }
        if self.urgent_only && product.days_to_expiry > URGENT_EXPIRY_DAYS {
            return false;
        }
        self.stock_level.contains(product.stock)
    }
}

/// Ordering applied to the visible product list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Urgency,
    PriceLow,
    PriceHigh,
    Stock,
    Discount,
    Name,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Urgency => "urgency",
            SortMode::PriceLow => "price_low",
            SortMode::PriceHigh => "price_high",
            SortMode::Stock => "stock",
            SortMode::Discount => "discount",
            SortMode::Name => "name",
        }
    }
}
