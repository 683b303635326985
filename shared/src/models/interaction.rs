//! Interaction events
//!
//! An [`InteractionEvent`] is created once per user action and sent to the
//! backend exactly once; it is never mutated after construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// User action kinds recorded against a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Viewed,
    Added,
    Favorited,
    Bought,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Viewed => "viewed",
            ActionType::Added => "added",
            ActionType::Favorited => "favorited",
            ActionType::Bought => "bought",
        }
    }

    /// Only `bought` goes through the optimistic stock machinery
    pub fn mutates_stock(&self) -> bool {
        matches!(self, ActionType::Bought)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single user interaction with a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "actionType")]
    pub action_type: ActionType,
    /// Positive, currently always 1
    pub quantity: u32,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl InteractionEvent {
    /// Create an event for a single-quantity action, stamped now
    pub fn new(
        user_id: impl Into<String>,
        product_id: impl Into<String>,
        action_type: ActionType,
    ) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), Value::from("dashboard"));
        metadata.insert("device".to_string(), Value::from("desktop"));

        Self {
            user_id: user_id.into(),
            product_id: product_id.into(),
            action_type,
            quantity: 1,
            timestamp: Utc::now(),
            session_id: format!("session_{}", uuid::Uuid::new_v4()),
            metadata,
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_wire_strings() {
        assert_eq!(
            serde_json::to_string(&ActionType::Bought).unwrap(),
            "\"bought\""
        );
        let parsed: ActionType = serde_json::from_str("\"favorited\"").unwrap();
        assert_eq!(parsed, ActionType::Favorited);
    }

    #[test]
    fn test_event_defaults() {
        let event = InteractionEvent::new("user-1", "p1", ActionType::Viewed);
        assert_eq!(event.quantity, 1);
        assert!(event.session_id.starts_with("session_"));
        assert_eq!(event.metadata.get("source").unwrap(), "dashboard");
    }

    #[test]
    fn test_event_wire_field_names() {
        let event = InteractionEvent::new("user-1", "p1", ActionType::Bought);
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("productId").is_some());
        assert_eq!(json.get("actionType").unwrap(), "bought");
        assert!(json.get("session_id").is_some());
    }
}
