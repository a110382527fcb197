use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::{delete_review_from_database, get_review}, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Deleting review",
    skip(pool)
)]
pub async fn delete_review(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, ApiError> {
    let review_id = path.into_inner();
    let review = get_review(get_pooled_connection(&pool).await?, review_id)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Review not found"))?;

    user.ensure_owner_or_admin(review.user_id, "You can only delete your own reviews")?;

    if !delete_review_from_database(get_pooled_connection(&pool).await?, review_id).await? {
        return Err(ApiError::not_found("Review not found"))
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Review deleted" })))
}
