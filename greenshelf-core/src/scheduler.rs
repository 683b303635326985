//! SyncScheduler - periodic and event-driven cache refresh
//!
//! Keeps the [`CatalogCache`](crate::CatalogCache) reasonably fresh without
//! the coordinator's help: products on a fixed interval (and on explicit
//! invalidation), recommendations on their own longer interval. A failed
//! fetch is retried a bounded number of times with a fixed delay before a
//! page-level failure event is emitted; a manual retry is just another
//! invalidation.

use crate::cache::CatalogCache;
use crate::events::CatalogEvent;
use greenshelf_client::{ClientError, ProductQuery, ProductRepository};
use shared::Product;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify, RwLock};
use tokio::time::interval;

/// Scheduler timing and retry budget
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Full product refresh cadence
    pub product_interval: Duration,
    /// Recommendation refresh cadence, independent of products
    pub recommendation_interval: Duration,
    /// Retries after the initial attempt before surfacing a page-level
    /// error (3 retries means 4 requests total)
    pub retry_attempts: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
    /// Recommendation list size
    pub top_k: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            product_interval: Duration::from_secs(30),
            recommendation_interval: Duration::from_secs(60),
            retry_attempts: 3,
            retry_delay: Duration::from_secs(1),
            top_k: 10,
        }
    }
}

/// Explicit invalidation triggers shared between the coordinator, the
/// service, and the scheduler loop
#[derive(Clone, Default)]
pub struct InvalidationHandle {
    products: Arc<Notify>,
    recommendations: Arc<Notify>,
}

impl InvalidationHandle {
    /// Request an out-of-cycle product refresh
    pub fn invalidate_products(&self) {
        self.products.notify_one();
    }

    /// Request an out-of-cycle recommendation refresh
    pub fn invalidate_recommendations(&self) {
        self.recommendations.notify_one();
    }

    pub(crate) async fn products_invalidated(&self) {
        self.products.notified().await;
    }

    pub(crate) async fn recommendations_invalidated(&self) {
        self.recommendations.notified().await;
    }
}

/// Background refresh loop
pub struct SyncScheduler {
    cache: Arc<RwLock<CatalogCache>>,
    repository: Arc<dyn ProductRepository>,
    recommendations: Arc<RwLock<Vec<Product>>>,
    events: broadcast::Sender<CatalogEvent>,
    invalidations: InvalidationHandle,
    query: ProductQuery,
    user_id: String,
    config: SyncConfig,
}

impl SyncScheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cache: Arc<RwLock<CatalogCache>>,
        repository: Arc<dyn ProductRepository>,
        recommendations: Arc<RwLock<Vec<Product>>>,
        events: broadcast::Sender<CatalogEvent>,
        invalidations: InvalidationHandle,
        query: ProductQuery,
        user_id: impl Into<String>,
        config: SyncConfig,
    ) -> Self {
        Self {
            cache,
            repository,
            recommendations,
            events,
            invalidations,
            query,
            user_id: user_id.into(),
            config,
        }
    }

    /// Run the refresh loop until the task is dropped
    ///
    /// The first tick of each interval fires immediately, so the loop also
    /// performs the initial load.
    pub async fn run(self) {
        let mut product_tick = interval(self.config.product_interval);
        let mut recommendation_tick = interval(self.config.recommendation_interval);

        loop {
            tokio::select! {
                _ = product_tick.tick() => {
                    self.refresh_products().await;
                }
                _ = self.invalidations.products_invalidated() => {
                    self.refresh_products().await;
                }
                _ = recommendation_tick.tick() => {
                    self.refresh_recommendations().await;
                }
                _ = self.invalidations.recommendations_invalidated() => {
                    self.refresh_recommendations().await;
                }
            }
        }
    }

    /// One full product refresh, including the superseding check
    pub async fn refresh_products(&self) {
        // Snapshot the generation before the fetch; an optimistic mutation
        // started while the request is in flight supersedes the result.
        let generation_before = self.cache.read().await.generation();

        match self.fetch_products_with_retry().await {
            Ok(response) => {
                let mut cache = self.cache.write().await;
                if cache.generation() != generation_before {
                    tracing::debug!(
                        stale_generation = generation_before,
                        current_generation = cache.generation(),
                        "Discarding superseded product snapshot"
                    );
                    return;
                }

                let count = response.products.len();
                let database_empty = response.database_empty;
                cache.load(response.products, database_empty);
                drop(cache);

                tracing::debug!(count, database_empty, "Catalog refreshed");
                let _ = self.events.send(CatalogEvent::CatalogRefreshed {
                    count,
                    database_empty,
                });
            }
            Err(error) => {
                tracing::error!(error = %error, "Product refresh gave up");
                let _ = self.events.send(CatalogEvent::SyncFailed {
                    message: error.to_string(),
                });
            }
        }
    }

    /// One recommendation refresh; failures only log (the catalog view
    /// does not depend on recommendations)
    pub async fn refresh_recommendations(&self) {
        match self
            .repository
            .fetch_recommendations(&self.user_id, self.config.top_k)
            .await
        {
            Ok(response) => {
                let count = response.recommendations.len();
                *self.recommendations.write().await = response.recommendations;
                tracing::debug!(count, "Recommendations refreshed");
                let _ = self
                    .events
                    .send(CatalogEvent::RecommendationsRefreshed { count });
            }
            Err(error) => {
                tracing::warn!(error = %error, "Recommendation refresh failed");
            }
        }
    }

    async fn fetch_products_with_retry(
        &self,
    ) -> Result<greenshelf_client::ProductsResponse, ClientError> {
        // Initial attempt plus `retry_attempts` retries.
        let mut retries_used = 0;
        loop {
            match self.repository.fetch_products(&self.query).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    tracing::warn!(
                        retries_used,
                        retry_budget = self.config.retry_attempts,
                        error = %error,
                        "Product fetch failed"
                    );
                    if retries_used >= self.config.retry_attempts {
                        return Err(error);
                    }
                    retries_used += 1;
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }
}
