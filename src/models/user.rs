use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// The three roles in the marketplace. Closed set: adding a role is a
/// compile-time-checked change everywhere it is matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    ShopOwner,
    DeliveryAgent,
}

/// Geographic point with a human-readable address, stored as JSONB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

// DB models

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub location: Option<Json<GeoLocation>>,
    pub rating: f64,
    pub total_reviews: i32,
    pub created_at: DateTime<Utc>,
}

// Request types

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub phone: String,
    pub name: String,
    pub role: UserRole,
    pub location: Option<GeoLocation>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Response types

/// User record as exposed over the wire. The password hash never leaves
/// the database layer through this type.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub role: UserRole,
    pub location: Option<GeoLocation>,
    pub rating: f64,
    pub total_reviews: i32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            phone: user.phone,
            name: user.name,
            role: user.role,
            location: user.location.map(|l| l.0),
            rating: user.rating,
            total_reviews: user.total_reviews,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::ShopOwner).unwrap(),
            "\"shop_owner\""
        );
        assert_eq!(
            serde_json::to_string(&UserRole::DeliveryAgent).unwrap(),
            "\"delivery_agent\""
        );
        assert_eq!(
            serde_json::to_string(&UserRole::Customer).unwrap(),
            "\"customer\""
        );
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<UserRole>("\"admin\"").is_err());
    }

    #[test]
    fn profile_drops_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            phone: "555-0100".to_string(),
            name: "Test".to_string(),
            role: UserRole::Customer,
            password: Some("$2b$12$hash".to_string()),
            location: None,
            rating: 0.0,
            total_reviews: 0,
            created_at: Utc::now(),
        };

        let profile = UserProfile::from(user);
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "customer");
    }
}
