use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{CreateShopRequest, Shop},
};

pub async fn create_shop(pool: &PgPool, owner_id: Uuid, req: &CreateShopRequest) -> Result<Shop> {
    let shop = sqlx::query_as::<_, Shop>(
        "INSERT INTO shops (owner_id, name, description, location, address, phone)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(owner_id)
    .bind(&req.name)
    .bind(&req.description)
    .bind(Json(&req.location))
    .bind(&req.address)
    .bind(&req.phone)
    .fetch_one(pool)
    .await?;

    Ok(shop)
}

pub async fn list_active(pool: &PgPool) -> Result<Vec<Shop>> {
    let shops = sqlx::query_as::<_, Shop>(
        "SELECT * FROM shops WHERE is_active = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(shops)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Shop>> {
    let shop = sqlx::query_as::<_, Shop>("SELECT * FROM shops WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(shop)
}

pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Shop>> {
    let shops = sqlx::query_as::<_, Shop>(
        "SELECT * FROM shops WHERE owner_id = $1 ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(shops)
}

pub async fn find_by_id_and_owner(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<Option<Shop>> {
    let shop = sqlx::query_as::<_, Shop>("SELECT * FROM shops WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

    Ok(shop)
}
