use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a review is attached to. Customers rate shops and delivery agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "review_target", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReviewTarget {
    Shop,
    DeliveryAgent,
}

// DB models

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub reviewer_id: Uuid,
    pub target_id: Uuid,
    pub target_type: ReviewTarget,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

// Request types

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub target_id: Uuid,
    pub target_type: ReviewTarget,
    pub rating: i32,
    pub comment: String,
}
