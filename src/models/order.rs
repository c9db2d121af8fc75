use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::GeoLocation;

/// Order delivery lifecycle. Strictly linear: an order is created `pending`,
/// a shop owner assigns an agent (`assigned`), and the agent advances it to
/// `picked_up` and finally `delivered`. There is no cancellation or
/// re-assignment path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Assigned,
    PickedUp,
    Delivered,
}

impl OrderStatus {
    /// The single permitted next status, or `None` for the terminal state.
    /// Every status mutation in the system validates against this table;
    /// nothing else decides what "next" means.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Assigned),
            OrderStatus::Assigned => Some(OrderStatus::PickedUp),
            OrderStatus::PickedUp => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Whether moving from `self` to `target` is a valid transition.
    pub fn can_advance_to(self, target: OrderStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Assigned => "assigned",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// DB models

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Uuid,
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub delivery_location: Json<GeoLocation>,
    pub status: OrderStatus,
    pub delivery_agent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot of one ordered product line, immutable after order creation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    #[serde(skip_serializing)]
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// Line data prepared by the order handler, with the authoritative catalog
/// price snapshotted in.
#[derive(Debug, Clone)]
pub struct OrderItemData {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

// Request types

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub shop_id: Uuid,
    pub items: Vec<OrderItemRequest>,
    pub delivery_address: String,
    pub delivery_location: GeoLocation,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct AssignQuery {
    pub agent_id: Uuid,
}

// Response types

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Assigned,
        OrderStatus::PickedUp,
        OrderStatus::Delivered,
    ];

    #[test]
    fn lifecycle_is_strictly_linear() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Assigned));
        assert_eq!(OrderStatus::Assigned.next(), Some(OrderStatus::PickedUp));
        assert_eq!(OrderStatus::PickedUp.next(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.next(), None);
    }

    #[test]
    fn delivered_is_the_only_terminal_state() {
        for status in ALL {
            assert_eq!(status.is_terminal(), status == OrderStatus::Delivered);
        }
    }

    #[test]
    fn every_pair_outside_the_table_is_rejected() {
        let allowed = [
            (OrderStatus::Pending, OrderStatus::Assigned),
            (OrderStatus::Assigned, OrderStatus::PickedUp),
            (OrderStatus::PickedUp, OrderStatus::Delivered),
        ];

        for from in ALL {
            for to in ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_advance_to(to),
                    expected,
                    "transition {:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn backward_and_terminal_transitions_are_rejected() {
        assert!(!OrderStatus::PickedUp.can_advance_to(OrderStatus::Assigned));
        assert!(!OrderStatus::Delivered.can_advance_to(OrderStatus::PickedUp));
        assert!(!OrderStatus::Assigned.can_advance_to(OrderStatus::Pending));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PickedUp).unwrap(),
            "\"picked_up\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"assigned\"").unwrap(),
            OrderStatus::Assigned
        );
        assert!(serde_json::from_str::<OrderStatus>("\"cancelled\"").is_err());
    }

    #[test]
    fn status_query_parses_from_url_encoding() {
        let q: StatusQuery = serde_urlencoded::from_str("status=picked_up").unwrap();
        assert_eq!(q.status, OrderStatus::PickedUp);
        assert!(serde_urlencoded::from_str::<StatusQuery>("status=refunded").is_err());
    }
}
