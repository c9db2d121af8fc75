use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Product, ProductListQuery, ProductPayload, ShopIdQuery, UserRole},
    queries::{product_queries, shop_queries},
    utils::extractors::{extract_user_id, require_role},
    utils::jwt::Claims,
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = product_queries::list_available(&state.db, params.shop_id).await?;

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ShopIdQuery>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>> {
    require_role(
        &claims,
        UserRole::ShopOwner,
        "Only shop owners can create products",
    )?;
    let owner_id = extract_user_id(&claims)?;

    validate_product(&payload)?;

    // Listing into someone else's shop is a 404, not a 403: the caller only
    // learns that no such shop exists under their account.
    shop_queries::find_by_id_and_owner(&state.db, params.shop_id, owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Shop not found or not authorized".to_string()))?;

    let product = product_queries::create_product(&state.db, params.shop_id, &payload).await?;

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>> {
    require_role(&claims, UserRole::ShopOwner, "Not authorized")?;
    let owner_id = extract_user_id(&claims)?;

    validate_product(&payload)?;

    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    shop_queries::find_by_id_and_owner(&state.db, product.shop_id, owner_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Not authorized".to_string()))?;

    let updated = product_queries::update_product(&state.db, id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(updated))
}

fn validate_product(payload: &ProductPayload) -> Result<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Product name cannot be empty".to_string(),
        ));
    }

    if payload.price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Price cannot be negative".to_string(),
        ));
    }

    if payload.stock < 0 {
        return Err(AppError::BadRequest(
            "Stock cannot be negative".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ProductPayload {
        ProductPayload {
            name: "Apples".to_string(),
            description: "Fresh".to_string(),
            price: Decimal::new(250, 2),
            category: "grocery".to_string(),
            image_url: None,
            stock: 10,
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(validate_product(&payload()).is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut p = payload();
        p.price = Decimal::new(-1, 0);
        assert!(validate_product(&p).is_err());
    }

    #[test]
    fn negative_stock_is_rejected() {
        let mut p = payload();
        p.stock = -1;
        assert!(validate_product(&p).is_err());
    }

    #[test]
    fn zero_stock_is_allowed_but_zero_price_too() {
        let mut p = payload();
        p.stock = 0;
        p.price = Decimal::ZERO;
        assert!(validate_product(&p).is_ok());
    }
}
