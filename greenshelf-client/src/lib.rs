//! Greenshelf Client - HTTP repository for the catalog backend
//!
//! Provides the [`ProductRepository`] boundary trait and the reqwest-backed
//! [`HttpRepository`] that talks to the backend API.

pub mod config;
pub mod error;
pub mod repository;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use repository::{HttpRepository, ProductRepository};

// Re-export shared wire types for convenience
pub use shared::api::{
    BulkRequest, BulkResponse, DatabaseStatus, InteractionResponse, PopulateResponse,
    ProductQuery, ProductsResponse, RecommendationsResponse,
};
