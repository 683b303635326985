//! API request/response DTOs
//!
//! Wire contracts shared between the repository client and the core. Field
//! names follow the backend's JSON exactly.

use crate::models::ActionType;
use crate::query::SortMode;
use crate::Product;
use serde::{Deserialize, Serialize};

// =============================================================================
// Product query
// =============================================================================

/// Query parameters for `GET /products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub sort: SortMode,
    pub limit: u32,
    pub skip: u32,
    pub category: Option<String>,
    pub discount_only: bool,
    pub urgent_only: bool,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: SortMode::default(),
            limit: 100,
            skip: 0,
            category: None,
            discount_only: false,
            urgent_only: false,
        }
    }
}

impl ProductQuery {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Render as URL query pairs, omitting inactive parameters
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("sort", self.sort.as_str().to_string()),
            ("limit", self.limit.to_string()),
            ("skip", self.skip.to_string()),
        ];
        if let Some(search) = &self.search {
            if !search.is_empty() {
                pairs.push(("search", search.clone()));
            }
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if self.discount_only {
            pairs.push(("discount_only", "true".to_string()));
        }
        if self.urgent_only {
            pairs.push(("urgent_only", "true".to_string()));
        }
        pairs
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Response for `GET /products`
///
/// `database_empty` signals the backing store holds no products at all,
/// distinct from a query that merely matched nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    #[serde(default)]
    pub database_empty: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response for `POST /interactions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(default)]
    pub can_sell: bool,
    #[serde(default)]
    pub stock_updated: bool,
    #[serde(default)]
    pub new_stock: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response for `GET /recommendations/{userId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Product>,
}

/// Response for `GET /database/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub status: String,
    #[serde(default)]
    pub collections: CollectionCounts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionCounts {
    #[serde(default)]
    pub products: u64,
}

/// Response for `POST /database/populate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulateResponse {
    pub populated: bool,
    #[serde(default)]
    pub products_count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Bulk operations
// =============================================================================

/// Request body for `POST /products/bulk`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRequest {
    pub operations: Vec<BulkOperation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkOperation {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "actionType")]
    pub action_type: ActionType,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResponse {
    pub results: Vec<BulkResult>,
}

/// Per-item outcome of a bulk request; `error` is set on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResult {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_pairs() {
        let pairs = ProductQuery::default().to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("sort", "urgency".to_string()),
                ("limit", "100".to_string()),
                ("skip", "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_include_active_filters() {
        let query = ProductQuery {
            discount_only: true,
            urgent_only: true,
            ..ProductQuery::default().with_search("milk")
        };
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("search", "milk".to_string())));
        assert!(pairs.contains(&("discount_only", "true".to_string())));
        assert!(pairs.contains(&("urgent_only", "true".to_string())));
    }

    #[test]
    fn test_interaction_response_defaults() {
        let resp: InteractionResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.can_sell);
        assert!(!resp.stock_updated);
        assert!(resp.new_stock.is_none());
        assert!(resp.error.is_none());
    }
}
