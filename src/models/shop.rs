use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::GeoLocation;

// DB models

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Shop {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub location: Json<GeoLocation>,
    pub address: String,
    pub phone: String,
    pub rating: f64,
    pub total_reviews: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// Request types

#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub description: String,
    pub location: GeoLocation,
    pub address: String,
    pub phone: String,
}
