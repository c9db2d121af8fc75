use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{GeoLocation, User, UserRole},
};

pub async fn create_user(
    pool: &PgPool,
    email: &str,
    phone: &str,
    name: &str,
    role: UserRole,
    location: Option<&GeoLocation>,
    password_hash: &str,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, phone, name, role, location, password)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(email)
    .bind(phone)
    .bind(name)
    .bind(role)
    .bind(location.map(Json))
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn list_delivery_agents(pool: &PgPool) -> Result<Vec<User>> {
    let agents = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE role = $1 ORDER BY rating DESC, created_at ASC",
    )
    .bind(UserRole::DeliveryAgent)
    .fetch_all(pool)
    .await?;

    Ok(agents)
}
