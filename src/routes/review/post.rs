use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::{create_reviews, CreateReviewError, NewReviews}, domain::{review_image::validate_images, Rating, ReviewImage}, error::ApiError, utils::{get_pooled_connection, DbPool}};

use super::validate_comment;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm{
    #[serde(default)]
    product_ids: Vec<Uuid>,
    order_id: Option<Uuid>,
    rating: Option<i64>,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    images: Vec<ReviewImage>
}

impl ReviewForm {
    // Checks run in a fixed order, the first failure is reported
    pub fn into_new_reviews(self, user_id: Uuid) -> Result<NewReviews, String>{
        if self.product_ids.is_empty() {
            return Err("Product ids are required".into())
        }
        let order_id = self.order_id.ok_or("Order id is required")?;
        let rating = self.rating
                        .ok_or("Rating is required")
                        .map_err(String::from)
                        .and_then(Rating::parse)?;
        validate_comment(&self.comment)?;
        let images = validate_images(&self.images)?;

        Ok(NewReviews{
            user_id,
            order_id,
            product_ids: self.product_ids,
            rating,
            comment: self.comment,
            images
        })
    }
}

impl From<CreateReviewError> for ApiError {
    fn from(value: CreateReviewError) -> Self {
        match value {
            CreateReviewError::OrderNotFound
            | CreateReviewError::ProductNotFound(_) => ApiError::not_found(value.to_string()),
            CreateReviewError::OrderNotOwned => ApiError::forbidden(value.to_string()),
            CreateReviewError::AlreadyReviewed => ApiError::validation(value.to_string()),
            e => ApiError::Unexpected(anyhow::Error::new(e))
        }
    }
}

#[tracing::instrument(
    "Posting reviews",
    skip(pool, form),
    fields(user_id = %user.user_id)
)]
pub async fn post_reviews(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    form: web::Json<ReviewForm>
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    user.ensure_self(user_id, "You can only post reviews as yourself")?;

    let new_reviews = form.into_inner()
                        .into_new_reviews(user_id)
                        .map_err(ApiError::Validation)?;

    let conn = get_pooled_connection(&pool).await?;
    let created = create_reviews(conn, new_reviews).await?;

    Ok(HttpResponse::Created().json(created))
}
