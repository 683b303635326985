//! MutationCoordinator - optimistic stock mutations
//!
//! Executes a user action as an optimistic-then-reconciled mutation against
//! the [`CatalogCache`] and the repository.
//!
//! # Mutation flow for a `bought` action
//!
//! ```text
//! record_action(id, Bought)
//!     ├─ 1. Local guards: product known, stock > 0, no pending mutation
//!     ├─ 2. Enter Pending: capture snapshot, decrement stock,
//!     │     set is_optimistic, bump cache generation
//!     ├─ 3. Send the interaction
//!     ├─ 4a. Confirmed  → commit authoritative new_stock, clear flag
//!     ├─ 4b. Rejected/failed → restore the captured snapshot exactly
//!     └─ 5. Emit outcome event, request invalidation
//! ```
//!
//! At most one Pending mutation per product id; a second `bought` while one
//! is outstanding is rejected locally before any network call. Failures are
//! never retried here; the scheduler owns retries.

use crate::cache::{CatalogCache, StockPatch};
use crate::events::CatalogEvent;
use crate::scheduler::InvalidationHandle;
use greenshelf_client::{ClientError, ProductRepository};
use shared::{ActionType, InteractionEvent, Product};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex, RwLock};

/// Lifecycle of a per-product mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Pending,
    Committed,
    RolledBack,
}

/// Successful outcome of [`MutationCoordinator::record_action`]
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// A sale committed with the server's authoritative stock
    Committed { product_id: String, new_stock: u32 },
    /// A non-sale action was recorded
    Recorded {
        product_id: String,
        action_type: ActionType,
    },
}

/// Coordinator errors; all user-facing and non-fatal
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Product not found: {0}")]
    UnknownProduct(String),

    /// Local guard: a sale needs `stock > 0` before entering Pending
    #[error("Product is out of stock: {0}")]
    OutOfStock(String),

    /// A sale for this product is already outstanding; nothing to do
    #[error("A sale is already pending for product: {0}")]
    AlreadyPending(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Coordinates optimistic mutations between the cache and the repository
pub struct MutationCoordinator {
    cache: Arc<RwLock<CatalogCache>>,
    repository: Arc<dyn ProductRepository>,
    events: broadcast::Sender<CatalogEvent>,
    invalidations: InvalidationHandle,
    pending: Mutex<HashSet<String>>,
    user_id: String,
}

impl MutationCoordinator {
    pub fn new(
        cache: Arc<RwLock<CatalogCache>>,
        repository: Arc<dyn ProductRepository>,
        events: broadcast::Sender<CatalogEvent>,
        invalidations: InvalidationHandle,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            repository,
            events,
            invalidations,
            pending: Mutex::new(HashSet::new()),
            user_id: user_id.into(),
        }
    }

    /// Live state of the per-product mutation machine
    ///
    /// Committed and RolledBack are terminal states reported through the
    /// [`record_action`](Self::record_action) result; between calls a
    /// product is either Idle or Pending.
    pub async fn mutation_state(&self, product_id: &str) -> MutationState {
        if self.pending.lock().await.contains(product_id) {
            MutationState::Pending
        } else {
            MutationState::Idle
        }
    }

    /// Record a user action against a product
    pub async fn record_action(
        &self,
        product_id: &str,
        action_type: ActionType,
    ) -> Result<ActionOutcome, CoordinatorError> {
        if action_type.mutates_stock() {
            self.record_sale(product_id).await
        } else {
            self.record_notification(product_id, action_type).await
        }
    }

    /// Ordered sequence of independent per-product mutations
    ///
    /// Not a transaction: each item's outcome stands on its own and partial
    /// success across the batch is expected. One invalidation is requested
    /// after the whole batch.
    pub async fn record_bulk(
        &self,
        product_ids: &[String],
        action_type: ActionType,
    ) -> Vec<(String, Result<ActionOutcome, CoordinatorError>)> {
        let mut results = Vec::with_capacity(product_ids.len());
        for product_id in product_ids {
            let outcome = self.record_action(product_id, action_type).await;
            if let Err(e) = &outcome {
                tracing::warn!(product_id = %product_id, error = %e, "Bulk item failed");
            }
            results.push((product_id.clone(), outcome));
        }

        self.invalidations.invalidate_products();
        self.invalidations.invalidate_recommendations();
        results
    }

    /// Fire-and-forget notification: no cache mutation, no rollback
    async fn record_notification(
        &self,
        product_id: &str,
        action_type: ActionType,
    ) -> Result<ActionOutcome, CoordinatorError> {
        let event = InteractionEvent::new(&self.user_id, product_id, action_type);
        self.repository.send_interaction(&event).await?;

        tracing::debug!(product_id = %product_id, action = %action_type, "Action recorded");
        let _ = self.events.send(CatalogEvent::ActionRecorded {
            product_id: product_id.to_string(),
            action_type,
        });
        self.invalidations.invalidate_recommendations();

        Ok(ActionOutcome::Recorded {
            product_id: product_id.to_string(),
            action_type,
        })
    }

    /// The optimistic sale path
    async fn record_sale(&self, product_id: &str) -> Result<ActionOutcome, CoordinatorError> {
        // Local guards and the optimistic write happen atomically, before
        // any network traffic, so the UI sees the decrement immediately.
        let previous = self.enter_pending(product_id).await?;

        let event = InteractionEvent::new(&self.user_id, product_id, ActionType::Bought);
        let result = self.repository.send_interaction(&event).await;

        match result {
            Ok(response) if response.can_sell && response.stock_updated => {
                let new_stock = response.new_stock.unwrap_or(previous.stock - 1);
                self.commit(product_id, new_stock).await;
                Ok(ActionOutcome::Committed {
                    product_id: product_id.to_string(),
                    new_stock,
                })
            }
            Ok(response) => {
                // 2xx body that still refused the sale
                let error = ClientError::cannot_sell(response.error);
                self.rollback(product_id, previous, &error).await;
                Err(error.into())
            }
            Err(error) => {
                self.rollback(product_id, previous, &error).await;
                Err(error.into())
            }
        }
    }

    /// Guards + optimistic decrement; returns the pre-mutation snapshot
    async fn enter_pending(&self, product_id: &str) -> Result<Product, CoordinatorError> {
        let mut pending = self.pending.lock().await;
        if pending.contains(product_id) {
            tracing::debug!(product_id = %product_id, "Sale already pending, ignoring");
            return Err(CoordinatorError::AlreadyPending(product_id.to_string()));
        }

        let mut cache = self.cache.write().await;
        let previous = cache
            .get(product_id)
            .cloned()
            .ok_or_else(|| CoordinatorError::UnknownProduct(product_id.to_string()))?;

        if previous.stock == 0 {
            return Err(CoordinatorError::OutOfStock(product_id.to_string()));
        }

        let patch = StockPatch::new()
            .stock(previous.stock.saturating_sub(1))
            .optimistic(true);
        if let Err(e) = cache.patch(product_id, patch) {
            tracing::error!(error = %e, "Optimistic patch failed");
            return Err(CoordinatorError::UnknownProduct(product_id.to_string()));
        }

        // Any refresh fetched before this point is now stale.
        cache.bump_generation();
        pending.insert(product_id.to_string());

        tracing::debug!(
            product_id = %product_id,
            stock = previous.stock - 1,
            "Entered pending: optimistic decrement applied"
        );
        Ok(previous)
    }

    /// Pending → Committed: overwrite with the authoritative count
    async fn commit(&self, product_id: &str, new_stock: u32) {
        {
            let mut pending = self.pending.lock().await;
            let mut cache = self.cache.write().await;
            let patch = StockPatch::new().stock(new_stock).optimistic(false);
            if let Err(e) = cache.patch(product_id, patch) {
                tracing::warn!(error = %e, "Commit patch ignored");
            }
            pending.remove(product_id);
        }

        tracing::info!(product_id = %product_id, new_stock, "Sale committed");
        let _ = self.events.send(CatalogEvent::Sold {
            product_id: product_id.to_string(),
            new_stock,
        });
        if new_stock == 0 {
            let _ = self.events.send(CatalogEvent::OutOfStock {
                product_id: product_id.to_string(),
            });
        } else if new_stock < shared::models::LOW_STOCK_THRESHOLD {
            let _ = self.events.send(CatalogEvent::LowStock {
                product_id: product_id.to_string(),
                stock: new_stock,
            });
        }

        self.invalidations.invalidate_products();
        self.invalidations.invalidate_recommendations();
    }

    /// Pending → RolledBack: restore the pre-mutation snapshot exactly
    async fn rollback(&self, product_id: &str, previous: Product, error: &ClientError) {
        {
            let mut pending = self.pending.lock().await;
            let mut cache = self.cache.write().await;
            let patch = StockPatch::new()
                .stock(previous.stock)
                .optimistic(previous.is_optimistic);
            if let Err(e) = cache.patch(product_id, patch) {
                tracing::warn!(error = %e, "Rollback patch ignored");
            }
            pending.remove(product_id);
        }

        tracing::warn!(product_id = %product_id, error = %error, "Sale rolled back");
        let _ = self.events.send(CatalogEvent::SaleFailed {
            product_id: product_id.to_string(),
            message: error.to_string(),
        });

        // The server disagreed about stock; stop trusting the local view
        // and force a fresh fetch.
        if error.is_insufficient_stock() {
            self.invalidations.invalidate_products();
        }
    }
}
