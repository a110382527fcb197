use actix_web::{web, HttpResponse};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::AuthUser, configuration::ReviewSettings, db_interaction::{get_review, update_review}, domain::Rating, error::ApiError, utils::{get_pooled_connection, DbPool}};

use super::validate_comment;

#[derive(Deserialize, Debug)]
pub struct ReviewEditForm{
    rating: Option<i64>,
    comment: Option<String>
}

pub fn within_edit_window(created_at: DateTime<Utc>, now: DateTime<Utc>, window_days: i64) -> bool{
    now - created_at <= Duration::days(window_days)
}

#[tracing::instrument(
    "Editing review",
    skip(pool, settings, form)
)]
pub async fn edit_review(
    user: AuthUser,
    pool: web::Data<DbPool>,
    settings: web::Data<ReviewSettings>,
    path: web::Path<Uuid>,
    form: web::Json<ReviewEditForm>
) -> Result<HttpResponse, ApiError> {
    let review_id = path.into_inner();
    let review = get_review(get_pooled_connection(&pool).await?, review_id)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Review not found"))?;

    user.ensure_owner_or_admin(review.user_id, "You can only edit your own reviews")?;

    if !within_edit_window(review.created_at, Utc::now(), settings.edit_window_days) {
        return Err(ApiError::forbidden(format!(
            "You cannot edit reviews older than {} days",
            settings.edit_window_days
        )))
    }

    let form = form.into_inner();
    let rating = form.rating
                    .map(Rating::parse)
                    .transpose()
                    .map_err(ApiError::Validation)?;
    if let Some(comment) = &form.comment {
        validate_comment(comment).map_err(ApiError::Validation)?;
    }

    let review = update_review(get_pooled_connection(&pool).await?, review_id, rating, form.comment)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Review not found"))?;

    Ok(HttpResponse::Ok().json(review))
}
