use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, Result},
    models::UserRole,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub exp: usize,
}

pub fn generate_token(auth: &AuthConfig, user_id: Uuid, role: UserRole) -> Result<String> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::days(auth.token_ttl_days))
        .ok_or_else(|| AppError::InternalError("Failed to calculate expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Token generation failed: {}", e)))
}

pub fn verify_token(auth: &AuthConfig, token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: 7,
        }
    }

    #[test]
    fn token_round_trips_id_and_role() {
        let config = auth();
        let user_id = Uuid::new_v4();

        let token = generate_token(&config, user_id, UserRole::DeliveryAgent).unwrap();
        let claims = verify_token(&config, &token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, UserRole::DeliveryAgent);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = auth();
        let other = AuthConfig {
            jwt_secret: "different-secret".to_string(),
            token_ttl_days: 7,
        };

        let token = generate_token(&other, Uuid::new_v4(), UserRole::Customer).unwrap();
        assert!(verify_token(&config, &token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token(&auth(), "not.a.token").is_err());
    }
}
