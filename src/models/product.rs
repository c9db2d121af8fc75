use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// DB models

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image_url: Option<String>,
    pub stock: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

// Request types

/// Body for product creation and update; both routes take the same payload.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image_url: Option<String>,
    pub stock: i32,
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub shop_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ShopIdQuery {
    pub shop_id: Uuid,
}
