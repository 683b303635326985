//! Shared types for the Greenshelf dashboard
//!
//! Common types used across the client and core crates including domain
//! models, filter/sort specifications, and API request/response DTOs.

pub mod api;
pub mod models;
pub mod query;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{ActionType, InteractionEvent, Product};
pub use query::{FilterSpec, SortMode, StockLevel};
