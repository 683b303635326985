//! CatalogCache - keyed in-memory product snapshot
//!
//! Holds the last known snapshot of products keyed by product id, plus the
//! database-empty flag from the most recent load. Products are replaced
//! wholesale by [`CatalogCache::load`]; individual records are patched only
//! by the mutation coordinator between loads.

use shared::Product;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    /// A patch targeted a product no longer in the cache. Signals a stale
    /// write; callers log and ignore it.
    #[error("Stale cache write: product {0} not present")]
    StaleWrite(String),
}

/// Field patch applied to a single cached product
#[derive(Debug, Clone, Copy, Default)]
pub struct StockPatch {
    pub stock: Option<u32>,
    pub is_optimistic: Option<bool>,
}

impl StockPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn optimistic(mut self, flag: bool) -> Self {
        self.is_optimistic = Some(flag);
        self
    }
}

/// In-memory catalog snapshot
///
/// Products are stored in a `BTreeMap` so iteration order is deterministic.
/// The `generation` counter is bumped at the start of every optimistic
/// mutation; the scheduler compares generations around a fetch so a stale
/// full refresh cannot clobber a newer optimistic or committed value.
#[derive(Debug, Default)]
pub struct CatalogCache {
    products: BTreeMap<String, Product>,
    database_empty: bool,
    generation: u64,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full product set and the database-empty flag.
    ///
    /// Total overwrite, no merge, with one exception: a product currently
    /// `is_optimistic` keeps its cached record until its mutation resolves,
    /// so a background refresh cannot undo a pending local decrement.
    pub fn load(&mut self, snapshot: Vec<Product>, database_empty: bool) {
        let preserved: Vec<Product> = self
            .products
            .values()
            .filter(|p| p.is_optimistic)
            .cloned()
            .collect();

        self.products = snapshot
            .into_iter()
            .map(|p| (p.product_id.clone(), p))
            .collect();

        for product in preserved {
            tracing::debug!(
                product_id = %product.product_id,
                "Preserving in-flight optimistic record across refresh"
            );
            self.products.insert(product.product_id.clone(), product);
        }

        self.database_empty = database_empty;
    }

    /// Shallow-merge a patch into one product
    pub fn patch(&mut self, product_id: &str, patch: StockPatch) -> Result<(), CacheError> {
        let product = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| CacheError::StaleWrite(product_id.to_string()))?;

        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(flag) = patch.is_optimistic {
            product.is_optimistic = flag;
        }
        Ok(())
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// All cached products, in key order
    pub fn all(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// True when the most recent load reported an empty backing store
    pub fn database_empty(&self) -> bool {
        self.database_empty
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark the cache newer than any fetch started before this call
    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, stock: u32) -> Product {
        Product {
            product_id: id.to_string(),
            name: format!("Product {}", id),
            category: "Dairy".to_string(),
            price: 2.0,
            discount: 0.0,
            discounted_price: None,
            stock,
            days_to_expiry: 5,
            urgency_score: 0.5,
            is_optimistic: false,
        }
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let mut cache = CatalogCache::new();
        cache.load(vec![product("p1", 3), product("p2", 7)], false);
        assert_eq!(cache.len(), 2);

        cache.load(vec![product("p3", 1)], false);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("p1").is_none());
        assert!(cache.get("p3").is_some());
    }

    #[test]
    fn test_load_preserves_optimistic_records() {
        let mut cache = CatalogCache::new();
        cache.load(vec![product("p1", 3), product("p2", 7)], false);
        cache
            .patch("p1", StockPatch::new().stock(2).optimistic(true))
            .unwrap();

        // Refresh reports stale stock for p1 and fresh stock for p2.
        let mut stale = product("p1", 3);
        stale.stock = 9;
        cache.load(vec![stale, product("p2", 4)], false);

        let p1 = cache.get("p1").unwrap();
        assert_eq!(p1.stock, 2);
        assert!(p1.is_optimistic);
        assert_eq!(cache.get("p2").unwrap().stock, 4);
    }

    #[test]
    fn test_patch_missing_product_is_stale_write() {
        let mut cache = CatalogCache::new();
        let err = cache.patch("ghost", StockPatch::new().stock(1)).unwrap_err();
        assert!(matches!(err, CacheError::StaleWrite(id) if id == "ghost"));
    }

    #[test]
    fn test_database_empty_flag_follows_load() {
        let mut cache = CatalogCache::new();
        cache.load(vec![], true);
        assert!(cache.database_empty());
        cache.load(vec![product("p1", 1)], false);
        assert!(!cache.database_empty());
    }

    #[test]
    fn test_generation_bumps() {
        let mut cache = CatalogCache::new();
        assert_eq!(cache.generation(), 0);
        cache.bump_generation();
        cache.bump_generation();
        assert_eq!(cache.generation(), 2);
    }
}
