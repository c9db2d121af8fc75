use axum::{extract::Request, extract::State, middleware::Next, response::Response};

use crate::{AppState, error::AppError};

/// Verifies the bearer token and stashes the decoded claims in request
/// extensions for handlers to pick up via `Extension<Claims>`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

    let claims = crate::utils::jwt::verify_token(&state.auth, token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
