//! Greenshelf Core - catalog cache and optimistic-mutation coordinator
//!
//! The client-side core of the perishable-catalog dashboard:
//!
//! - [`CatalogCache`] - keyed in-memory snapshot of products, the single
//!   source of truth for the UI
//! - [`engine`] - deterministic filter/sort pipeline deriving the visible
//!   product list
//! - [`MutationCoordinator`] - optimistic stock mutations with commit and
//!   rollback against the authoritative backend
//! - [`SyncScheduler`] - periodic and event-driven cache refresh with a
//!   bounded retry budget
//! - [`CatalogService`] - composition root wiring the pieces together
//!
//! The core emits [`CatalogEvent`]s over a broadcast channel; presentation
//! concerns (toasts, labels) live entirely outside this crate.

pub mod cache;
pub mod coordinator;
pub mod engine;
pub mod events;
pub mod scheduler;
pub mod service;

pub use cache::{CacheError, CatalogCache, StockPatch};
pub use coordinator::{ActionOutcome, CoordinatorError, MutationCoordinator, MutationState};
pub use events::CatalogEvent;
pub use scheduler::{InvalidationHandle, SyncConfig, SyncScheduler};
pub use service::CatalogService;
