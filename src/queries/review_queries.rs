use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{CreateReviewRequest, Review, ReviewTarget},
};

/// Inserts the review and recomputes the target's aggregate rating in the
/// same transaction. Returns `None` when the target record does not exist.
pub async fn create_review(
    pool: &PgPool,
    reviewer_id: Uuid,
    req: &CreateReviewRequest,
) -> Result<Option<Review>> {
    let mut tx = pool.begin().await?;

    let review = sqlx::query_as::<_, Review>(
        "INSERT INTO reviews (reviewer_id, target_id, target_type, rating, comment)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(reviewer_id)
    .bind(req.target_id)
    .bind(req.target_type)
    .bind(req.rating)
    .bind(&req.comment)
    .fetch_one(&mut *tx)
    .await?;

    let (avg_rating, count) = sqlx::query_as::<_, (f64, i64)>(
        "SELECT COALESCE(AVG(rating), 0)::float8, COUNT(*) FROM reviews WHERE target_id = $1",
    )
    .bind(req.target_id)
    .fetch_one(&mut *tx)
    .await?;

    let table = match req.target_type {
        ReviewTarget::Shop => "shops",
        ReviewTarget::DeliveryAgent => "users",
    };

    let result = sqlx::query(&format!(
        "UPDATE {} SET rating = $1, total_reviews = $2 WHERE id = $3",
        table
    ))
    .bind(avg_rating)
    .bind(count as i32)
    .bind(req.target_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;
    Ok(Some(review))
}

pub async fn list_for_target(pool: &PgPool, target_id: Uuid) -> Result<Vec<Review>> {
    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE target_id = $1 ORDER BY created_at DESC",
    )
    .bind(target_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}
