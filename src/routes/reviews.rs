use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateReviewRequest, Review, UserRole},
    queries::review_queries,
    utils::extractors::{extract_user_id, require_role},
    utils::jwt::Claims,
};

pub async fn create_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<Review>> {
    require_role(&claims, UserRole::Customer, "Only customers can leave reviews")?;
    let reviewer_id = extract_user_id(&claims)?;

    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let review = review_queries::create_review(&state.db, reviewer_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Review target not found".to_string()))?;

    Ok(Json(review))
}

pub async fn get_reviews(
    State(state): State<AppState>,
    Path(target_id): Path<Uuid>,
) -> Result<Json<Vec<Review>>> {
    let reviews = review_queries::list_for_target(&state.db, target_id).await?;

    Ok(Json(reviews))
}
