// greenshelf-core/examples/dashboard.rs
// Headless dashboard loop against a live backend

use greenshelf_client::ClientConfig;
use greenshelf_core::{CatalogEvent, CatalogService, SyncConfig};
use shared::{FilterSpec, SortMode};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let base_url = std::env::var("GREENSHELF_API_URL")
        .unwrap_or_else(|_| "http://localhost:5000/api".to_string());
    let user_id = std::env::var("GREENSHELF_USER_ID").unwrap_or_else(|_| "demo-user".to_string());

    let repository = Arc::new(ClientConfig::new(&base_url).build_repository());
    let service = CatalogService::new(repository, user_id);

    let mut events = service.subscribe();
    tokio::spawn(service.scheduler(SyncConfig::default()).run());

    // Print outcome events as the scheduler keeps the cache fresh.
    while let Ok(event) = events.recv().await {
        match &event {
            CatalogEvent::CatalogRefreshed { count, database_empty } => {
                tracing::info!(count, database_empty, "Catalog refreshed");

                let urgent = service
                    .visible_products("", &FilterSpec::default(), SortMode::Urgency)
                    .await;
                for product in urgent.iter().take(5) {
                    tracing::info!(
                        name = %product.name,
                        stock = product.stock,
                        days_to_expiry = product.days_to_expiry,
                        "Top urgency"
                    );
                }
            }
            CatalogEvent::SyncFailed { message } => {
                tracing::error!(%message, "Cannot reach server");
            }
            other => tracing::info!(event = ?other, "Catalog event"),
        }
    }

    Ok(())
}
