//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request could not complete (network/DNS/TLS)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response with the body's error message when present
    #[error("Server rejection ({status}): {message}")]
    Rejection { status: StatusCode, message: String },

    /// Rejection whose message identifies a stock shortfall; drives
    /// rollback + invalidation instead of a generic retry
    #[error("{0}")]
    InsufficientStock(String),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Build a rejection from a non-2xx status and raw body, promoting
    /// stock-shortfall messages to [`ClientError::InsufficientStock`]
    pub fn rejection(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                }
            });

        if is_stock_message(&message) {
            ClientError::InsufficientStock(message)
        } else {
            ClientError::Rejection { status, message }
        }
    }

    /// Build an insufficient-stock error from a 2xx body that still
    /// refused the sale (`can_sell = false`)
    pub fn cannot_sell(message: Option<String>) -> Self {
        ClientError::InsufficientStock(
            message.unwrap_or_else(|| "Cannot complete sale - insufficient stock".to_string()),
        )
    }

    pub fn is_insufficient_stock(&self) -> bool {
        matches!(self, ClientError::InsufficientStock(_))
    }
}

fn is_stock_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("insufficient stock") || lower.contains("out of stock")
}
