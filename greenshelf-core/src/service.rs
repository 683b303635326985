//! CatalogService - composition root
//!
//! Owns the cache, the coordinator, and the scheduler wiring, and exposes
//! the UI-facing API: derive the visible list, record actions, manage the
//! backing store, and subscribe to outcome events.

use crate::cache::CatalogCache;
use crate::coordinator::{ActionOutcome, CoordinatorError, MutationCoordinator, MutationState};
use crate::engine;
use crate::events::CatalogEvent;
use crate::scheduler::{InvalidationHandle, SyncConfig, SyncScheduler};
use greenshelf_client::{ClientResult, ProductQuery, ProductRepository};
use shared::api::{BulkOperation, BulkRequest, BulkResponse, DatabaseStatus, PopulateResponse};
use shared::{ActionType, FilterSpec, Product, SortMode};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// UI-facing facade over the catalog core
pub struct CatalogService {
    cache: Arc<RwLock<CatalogCache>>,
    repository: Arc<dyn ProductRepository>,
    recommendations: Arc<RwLock<Vec<Product>>>,
    coordinator: MutationCoordinator,
    events: broadcast::Sender<CatalogEvent>,
    invalidations: InvalidationHandle,
    user_id: String,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ProductRepository>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let cache = Arc::new(RwLock::new(CatalogCache::new()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let invalidations = InvalidationHandle::default();

        let coordinator = MutationCoordinator::new(
            cache.clone(),
            repository.clone(),
            events.clone(),
            invalidations.clone(),
            user_id.clone(),
        );

        Self {
            cache,
            repository,
            recommendations: Arc::new(RwLock::new(Vec::new())),
            coordinator,
            events,
            invalidations,
            user_id,
        }
    }

    /// Subscribe to outcome events (presentation layer boundary)
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Build the background scheduler sharing this service's state
    ///
    /// Spawn it with `tokio::spawn(service.scheduler(config).run())`; it
    /// also performs the initial load.
    pub fn scheduler(&self, config: SyncConfig) -> SyncScheduler {
        SyncScheduler::new(
            self.cache.clone(),
            self.repository.clone(),
            self.recommendations.clone(),
            self.events.clone(),
            self.invalidations.clone(),
            ProductQuery::default(),
            self.user_id.clone(),
            config,
        )
    }

    /// Derive the ordered visible list from the current snapshot
    pub async fn visible_products(
        &self,
        search: &str,
        filter: &FilterSpec,
        sort: SortMode,
    ) -> Vec<Product> {
        let cache = self.cache.read().await;
        engine::filter_and_sort(&cache.all(), search, filter, sort)
    }

    pub async fn product(&self, product_id: &str) -> Option<Product> {
        self.cache.read().await.get(product_id).cloned()
    }

    /// True when the most recent load reported an empty backing store
    pub async fn database_empty(&self) -> bool {
        self.cache.read().await.database_empty()
    }

    pub async fn recommendations(&self) -> Vec<Product> {
        self.recommendations.read().await.clone()
    }

    /// Record a user action (optimistic machinery for `bought`)
    pub async fn record_action(
        &self,
        product_id: &str,
        action_type: ActionType,
    ) -> Result<ActionOutcome, CoordinatorError> {
        self.coordinator.record_action(product_id, action_type).await
    }

    /// Record an action for each selected product, independently
    pub async fn record_bulk(
        &self,
        product_ids: &[String],
        action_type: ActionType,
    ) -> Vec<(String, Result<ActionOutcome, CoordinatorError>)> {
        self.coordinator.record_bulk(product_ids, action_type).await
    }

    pub async fn mutation_state(&self, product_id: &str) -> MutationState {
        self.coordinator.mutation_state(product_id).await
    }

    /// Submit a multi-select batch through the server's bulk endpoint
    ///
    /// Unlike [`record_bulk`](Self::record_bulk) this sends one request and
    /// lets the server process the items; per-item errors come back in the
    /// response. The catalog is invalidated afterwards either way.
    pub async fn submit_bulk(
        &self,
        product_ids: &[String],
        action_type: ActionType,
    ) -> ClientResult<BulkResponse> {
        let request = BulkRequest {
            operations: product_ids
                .iter()
                .map(|id| BulkOperation {
                    product_id: id.clone(),
                    action_type,
                    quantity: 1,
                })
                .collect(),
        };

        let result = self.repository.bulk_operations(&request).await;
        self.invalidations.invalidate_products();
        self.invalidations.invalidate_recommendations();
        result
    }

    /// Force a fresh product fetch (manual retry after a sync failure)
    pub fn invalidate(&self) {
        self.invalidations.invalidate_products();
    }

    pub async fn database_status(&self) -> ClientResult<DatabaseStatus> {
        self.repository.database_status().await
    }

    /// Populate an empty backing store, then refresh
    pub async fn populate_database(&self) -> ClientResult<PopulateResponse> {
        let response = self.repository.populate_database().await?;

        if response.populated {
            tracing::info!(
                products_count = response.products_count.unwrap_or(0),
                "Backing store populated"
            );
            let _ = self.events.send(CatalogEvent::DatabasePopulated {
                products_count: response.products_count.unwrap_or(0),
            });
            self.invalidations.invalidate_products();
        }

        Ok(response)
    }
}
