use axum::{Extension, Json, extract::State};

use crate::{
    AppState,
    error::Result,
    models::{UserProfile, UserRole},
    queries::user_queries,
    utils::extractors::require_role,
    utils::jwt::Claims,
};

pub async fn list_delivery_agents(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<UserProfile>>> {
    require_role(&claims, UserRole::ShopOwner, "Not authorized")?;

    let agents = user_queries::list_delivery_agents(&state.db).await?;

    Ok(Json(agents.into_iter().map(UserProfile::from).collect()))
}
