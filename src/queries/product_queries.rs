use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{Product, ProductPayload},
};

pub async fn create_product(pool: &PgPool, shop_id: Uuid, req: &ProductPayload) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (shop_id, name, description, price, category, image_url, stock)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(shop_id)
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(&req.category)
    .bind(&req.image_url)
    .bind(req.stock)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn list_available(pool: &PgPool, shop_id: Option<Uuid>) -> Result<Vec<Product>> {
    let products = match shop_id {
        Some(shop_id) => {
            sqlx::query_as::<_, Product>(
                "SELECT * FROM products WHERE is_available = TRUE AND shop_id = $1
                 ORDER BY created_at DESC",
            )
            .bind(shop_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Product>(
                "SELECT * FROM products WHERE is_available = TRUE ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Batch-fetch products for an order, keyed by id.
pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<HashMap<Uuid, Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

pub async fn update_product(pool: &PgPool, id: Uuid, req: &ProductPayload) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products
         SET name = $1, description = $2, price = $3, category = $4, image_url = $5, stock = $6
         WHERE id = $7 RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(&req.category)
    .bind(&req.image_url)
    .bind(req.stock)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}
