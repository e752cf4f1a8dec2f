//! Order entity and its stored form.

use chrono::{DateTime, Utc};
use item_store::Item;
use serde::{Deserialize, Serialize};

/// Status every order is created with. Transitions are handled elsewhere.
pub const INITIAL_STATUS: &str = "pending";

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i32,
}

impl OrderLine {
    /// Creates an order line.
    pub fn new(product_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }

    /// Returns true if the line names a product and a positive quantity.
    pub fn is_valid(&self) -> bool {
        !self.product_id.is_empty() && self.quantity > 0
    }
}

/// An order placed by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub order_id: String,
    /// Validated when the order was created; not enforced afterwards.
    pub user_id: String,
    pub items: Vec<OrderLine>,
    pub status: String,
    /// Set once by the store when the order is created.
    pub created_at: DateTime<Utc>,
}

/// An order as held in the order item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub user_id: String,
    pub items: Vec<OrderLine>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Item for OrderRecord {
    const KEY_ATTRIBUTE: &'static str = "order_id";

    fn key(&self) -> &str {
        &self.order_id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            order_id: record.order_id,
            user_id: record.user_id,
            items: record.items,
            status: record.status,
            created_at: record.created_at.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_validity() {
        assert!(OrderLine::new("p1", 1).is_valid());
        assert!(!OrderLine::new("", 1).is_valid());
        assert!(!OrderLine::new("p1", 0).is_valid());
        assert!(!OrderLine::new("p1", -3).is_valid());
    }

    #[test]
    fn record_serializes_with_snake_case_attributes() {
        let record = OrderRecord {
            order_id: "order-1".to_string(),
            user_id: "user-1".to_string(),
            items: vec![OrderLine::new("p1", 2)],
            status: INITIAL_STATUS.to_string(),
            created_at: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["order_id"], "order-1");
        assert_eq!(json["items"][0]["product_id"], "p1");
        assert_eq!(json["items"][0]["quantity"], 2);
    }
}
