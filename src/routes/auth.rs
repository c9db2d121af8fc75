use axum::{Extension, Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile},
    queries::user_queries,
    utils::extractors::extract_user_id,
    utils::jwt::{self, Claims},
};

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    validate_registration(&payload)?;

    if user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = user_queries::create_user(
        &state.db,
        &payload.email,
        &payload.phone,
        &payload.name,
        payload.role,
        payload.location.as_ref(),
        &password_hash,
    )
    .await?;

    let token = jwt::generate_token(&state.auth, user.id, user.role)?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let password_hash = user
        .password
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let is_valid = bcrypt::verify(&payload.password, password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = jwt::generate_token(&state.auth, user.id, user.role)?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserProfile>> {
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    Ok(Json(user.into()))
}

fn validate_registration(payload: &RegisterRequest) -> Result<()> {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }

    if payload.phone.trim().is_empty() {
        return Err(AppError::BadRequest("Phone cannot be empty".to_string()));
    }

    if payload.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn request() -> RegisterRequest {
        RegisterRequest {
            email: "shopper@example.com".to_string(),
            password: "correct-horse".to_string(),
            phone: "555-0100".to_string(),
            name: "Shopper".to_string(),
            role: UserRole::Customer,
            location: None,
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_registration(&request()).is_ok());
    }

    #[test]
    fn email_without_at_sign_is_rejected() {
        let mut req = request();
        req.email = "not-an-email".to_string();
        assert!(matches!(
            validate_registration(&req),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn short_password_is_rejected() {
        let mut req = request();
        req.password = "short".to_string();
        assert!(validate_registration(&req).is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut req = request();
        req.name = "   ".to_string();
        assert!(validate_registration(&req).is_err());
    }
}
