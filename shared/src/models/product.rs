//! Product Model

use serde::{Deserialize, Serialize};

/// Stock below this count (and above zero) is reported as low
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Products expiring within this many days count as urgent
pub const URGENT_EXPIRY_DAYS: u32 = 7;

/// Product entity as served by the catalog backend
///
/// `stock` is the authoritative on-hand count mirrored from the server;
/// it is an unsigned integer so a negative count is unrepresentable.
/// `is_optimistic` is transient client state: true only while a local
/// mutation for this product is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub name: String,
    pub category: String,
    /// Base price, never negative
    pub price: f64,
    /// Discount fraction in 0.0..=1.0
    #[serde(default)]
    pub discount: f64,
    /// Server-computed price after discount, present when `discount > 0`
    #[serde(default)]
    pub discounted_price: Option<f64>,
    /// Authoritative on-hand count
    pub stock: u32,
    #[serde(default)]
    pub days_to_expiry: u32,
    /// 0.0..=1.0, non-increasing as `days_to_expiry` grows
    #[serde(default)]
    pub urgency_score: f64,
    #[serde(rename = "isOptimistic", default)]
    pub is_optimistic: bool,
}

impl Product {
    /// Price the customer actually pays
    pub fn effective_price(&self) -> f64 {
        if self.discount > 0.0 {
            self.discounted_price.unwrap_or(self.price)
        } else {
            self.price
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock < LOW_STOCK_THRESHOLD
    }

    pub fn is_urgent(&self) -> bool {
        self.days_to_expiry <= URGENT_EXPIRY_DAYS
    }
}
