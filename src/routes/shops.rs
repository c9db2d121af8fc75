use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateShopRequest, Shop, UserRole},
    queries::shop_queries,
    utils::extractors::{extract_user_id, require_role},
    utils::jwt::Claims,
};

pub async fn list_shops(State(state): State<AppState>) -> Result<Json<Vec<Shop>>> {
    let shops = shop_queries::list_active(&state.db).await?;

    Ok(Json(shops))
}

pub async fn get_shop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Shop>> {
    let shop = shop_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

    Ok(Json(shop))
}

pub async fn create_shop(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateShopRequest>,
) -> Result<Json<Shop>> {
    require_role(&claims, UserRole::ShopOwner, "Only shop owners can create shops")?;
    let owner_id = extract_user_id(&claims)?;

    validate_shop(&payload)?;

    let shop = shop_queries::create_shop(&state.db, owner_id, &payload).await?;

    Ok(Json(shop))
}

pub async fn my_shops(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Shop>>> {
    require_role(&claims, UserRole::ShopOwner, "Not authorized")?;
    let owner_id = extract_user_id(&claims)?;

    let shops = shop_queries::list_by_owner(&state.db, owner_id).await?;

    Ok(Json(shops))
}

fn validate_shop(payload: &CreateShopRequest) -> Result<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Shop name cannot be empty".to_string()));
    }

    if payload.address.trim().is_empty() {
        return Err(AppError::BadRequest("Shop address cannot be empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoLocation;

    #[test]
    fn shop_without_name_is_rejected() {
        let payload = CreateShopRequest {
            name: "".to_string(),
            description: "Corner store".to_string(),
            location: GeoLocation {
                lat: 0.0,
                lng: 0.0,
                address: "Main St 1".to_string(),
            },
            address: "Main St 1".to_string(),
            phone: "555-0100".to_string(),
        };

        assert!(validate_shop(&payload).is_err());
    }
}
