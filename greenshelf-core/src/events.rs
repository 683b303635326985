//! Catalog events for the presentation layer
//!
//! The core never formats user-visible messages. Outcomes are published as
//! [`CatalogEvent`]s on a broadcast channel; a presentation layer subscribes
//! and translates them into toasts, badges, or page-level error states.

use serde::{Deserialize, Serialize};
use shared::ActionType;

/// Events emitted by the coordinator, scheduler, and service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// A sale committed with the server's authoritative count
    Sold { product_id: String, new_stock: u32 },
    /// Stock dropped below the low-stock threshold (but not to zero)
    LowStock { product_id: String, stock: u32 },
    /// Stock reached zero
    OutOfStock { product_id: String },
    /// A sale was rejected or failed and the cache was rolled back
    SaleFailed { product_id: String, message: String },
    /// A non-sale action (viewed/added/favorited) was recorded
    ActionRecorded {
        product_id: String,
        action_type: ActionType,
    },
    /// A full catalog snapshot was applied
    CatalogRefreshed { count: usize, database_empty: bool },
    /// The recommendation list was refreshed
    RecommendationsRefreshed { count: usize },
    /// A scheduled refresh exhausted its retry budget; page-level
    /// "cannot reach server" state until a manual retry
    SyncFailed { message: String },
    /// The backing store was populated on request
    DatabasePopulated { products_count: u64 },
}
