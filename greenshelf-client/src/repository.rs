//! Product repository boundary
//!
//! [`ProductRepository`] is the single network boundary the core depends
//! on; [`HttpRepository`] is the production implementation. Tests swap in
//! an in-memory mock.

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::api::{
    BulkRequest, BulkResponse, DatabaseStatus, InteractionResponse, PopulateResponse,
    ProductQuery, ProductsResponse, RecommendationsResponse,
};
use shared::{ActionType, InteractionEvent};

/// Remote catalog boundary
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// `GET /products`
    async fn fetch_products(&self, query: &ProductQuery) -> ClientResult<ProductsResponse>;

    /// `POST /interactions`
    async fn send_interaction(&self, event: &InteractionEvent)
        -> ClientResult<InteractionResponse>;

    /// `GET /recommendations/{userId}`
    async fn fetch_recommendations(
        &self,
        user_id: &str,
        top_k: u32,
    ) -> ClientResult<RecommendationsResponse>;

    /// `GET /database/status`
    async fn database_status(&self) -> ClientResult<DatabaseStatus>;

    /// `POST /database/populate`
    async fn populate_database(&self) -> ClientResult<PopulateResponse>;

    /// `POST /products/bulk`
    async fn bulk_operations(&self, request: &BulkRequest) -> ClientResult<BulkResponse>;
}

/// HTTP repository backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRepository {
    /// Create a new HTTP repository from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.post(&url);

        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::rejection(status, &text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ProductRepository for HttpRepository {
    async fn fetch_products(&self, query: &ProductQuery) -> ClientResult<ProductsResponse> {
        let response: ProductsResponse = self.get("/products", &query.to_query_pairs()).await?;

        if response.database_empty {
            tracing::warn!("Backing store is empty, no catalog data available");
        } else {
            tracing::debug!(count = response.products.len(), "Loaded product snapshot");
        }

        Ok(response)
    }

    async fn send_interaction(
        &self,
        event: &InteractionEvent,
    ) -> ClientResult<InteractionResponse> {
        let response: InteractionResponse = self.post("/interactions", Some(event)).await?;

        // A 2xx body can still refuse a sale; surface that as the same
        // error class as an insufficient-stock rejection.
        if event.action_type == ActionType::Bought && !response.can_sell {
            return Err(ClientError::cannot_sell(response.error));
        }

        Ok(response)
    }

    async fn fetch_recommendations(
        &self,
        user_id: &str,
        top_k: u32,
    ) -> ClientResult<RecommendationsResponse> {
        let path = format!("/recommendations/{}", user_id);
        self.get(&path, &[("top_k", top_k.to_string())]).await
    }

    async fn database_status(&self) -> ClientResult<DatabaseStatus> {
        self.get("/database/status", &[]).await
    }

    async fn populate_database(&self) -> ClientResult<PopulateResponse> {
        self.post::<PopulateResponse, ()>("/database/populate", None)
            .await
    }

    async fn bulk_operations(&self, request: &BulkRequest) -> ClientResult<BulkResponse> {
        let response: BulkResponse = self.post("/products/bulk", Some(request)).await?;

        let stock_errors = response
            .results
            .iter()
            .filter(|r| r.error.as_deref().is_some_and(|e| e.contains("stock")))
            .count();
        if stock_errors > 0 {
            tracing::warn!(count = stock_errors, "Bulk operation had stock issues");
        }

        Ok(response)
    }
}
