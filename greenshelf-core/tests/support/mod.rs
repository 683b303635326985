//! Test support: scripted in-memory repository
#![allow(dead_code)]

use async_trait::async_trait;
use greenshelf_client::{ClientError, ClientResult, ProductRepository};
use reqwest::StatusCode;
use shared::api::{
    BulkRequest, BulkResponse, BulkResult, DatabaseStatus, InteractionResponse, PopulateResponse,
    ProductQuery, ProductsResponse, RecommendationsResponse,
};
use shared::{InteractionEvent, Product};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn product(id: &str, name: &str, category: &str, stock: u32) -> Product {
    Product {
        product_id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price: 2.0,
        discount: 0.0,
        discounted_price: None,
        stock,
        days_to_expiry: 5,
        urgency_score: 0.5,
        is_optimistic: false,
    }
}

pub fn sale_confirmed(new_stock: u32) -> ClientResult<InteractionResponse> {
    Ok(InteractionResponse {
        can_sell: true,
        stock_updated: true,
        new_stock: Some(new_stock),
        error: None,
    })
}

pub fn sale_rejected(message: &str) -> ClientResult<InteractionResponse> {
    Err(ClientError::InsufficientStock(message.to_string()))
}

pub fn server_error(message: &str) -> ClientResult<InteractionResponse> {
    Err(ClientError::Rejection {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: message.to_string(),
    })
}

/// Scripted repository: serves a configurable product snapshot and a queue
/// of interaction outcomes, with optional artificial latency
#[derive(Default)]
pub struct MockRepository {
    products: Mutex<Vec<Product>>,
    database_empty: Mutex<bool>,
    recommendations: Mutex<Vec<Product>>,
    interactions: Mutex<VecDeque<ClientResult<InteractionResponse>>>,
    pub fetch_calls: AtomicU32,
    pub interaction_calls: AtomicU32,
    fail_fetches: AtomicU32,
    interaction_delay: Mutex<Option<Duration>>,
    fetch_delay: Mutex<Option<Duration>>,
}

impl MockRepository {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    pub fn set_products(&self, products: Vec<Product>) {
        *self.products.lock().unwrap() = products;
    }

    pub fn set_recommendations(&self, products: Vec<Product>) {
        *self.recommendations.lock().unwrap() = products;
    }

    pub fn push_interaction(&self, result: ClientResult<InteractionResponse>) {
        self.interactions.lock().unwrap().push_back(result);
    }

    /// Fail the next `count` product fetches with a 503
    pub fn fail_next_fetches(&self, count: u32) {
        self.fail_fetches.store(count, Ordering::SeqCst);
    }

    pub fn delay_interactions(&self, delay: Duration) {
        *self.interaction_delay.lock().unwrap() = Some(delay);
    }

    pub fn delay_fetches(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }
}

#[async_trait]
impl ProductRepository for MockRepository {
    async fn fetch_products(&self, _query: &ProductQuery) -> ClientResult<ProductsResponse> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let remaining = self.fail_fetches.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_fetches.store(remaining - 1, Ordering::SeqCst);
            return Err(ClientError::Rejection {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "service unavailable".to_string(),
            });
        }

        Ok(ProductsResponse {
            products: self.products.lock().unwrap().clone(),
            database_empty: *self.database_empty.lock().unwrap(),
            message: None,
        })
    }

    async fn send_interaction(
        &self,
        _event: &InteractionEvent,
    ) -> ClientResult<InteractionResponse> {
        self.interaction_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.interaction_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.interactions.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(InteractionResponse {
                can_sell: true,
                stock_updated: true,
                new_stock: None,
                error: None,
            }),
        }
    }

    async fn fetch_recommendations(
        &self,
        _user_id: &str,
        top_k: u32,
    ) -> ClientResult<RecommendationsResponse> {
        let mut recommendations = self.recommendations.lock().unwrap().clone();
        recommendations.truncate(top_k as usize);
        Ok(RecommendationsResponse { recommendations })
    }

    async fn database_status(&self) -> ClientResult<DatabaseStatus> {
        let products = self.products.lock().unwrap().len() as u64;
        Ok(DatabaseStatus {
            status: "connected".to_string(),
            collections: shared::api::CollectionCounts { products },
        })
    }

    async fn populate_database(&self) -> ClientResult<PopulateResponse> {
        let count = self.products.lock().unwrap().len() as u64;
        *self.database_empty.lock().unwrap() = false;
        Ok(PopulateResponse {
            populated: true,
            products_count: Some(count),
            message: None,
        })
    }

    async fn bulk_operations(&self, request: &BulkRequest) -> ClientResult<BulkResponse> {
        Ok(BulkResponse {
            results: request
                .operations
                .iter()
                .map(|op| BulkResult {
                    product_id: op.product_id.clone(),
                    error: None,
                })
                .collect(),
        })
    }
}
