use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::{list_reviews, ReviewFilter}, domain::{PageQuery, Pagination, Rating}, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Get reviews of product",
    skip(pool)
)]
pub async fn get_reviews_of_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>
) -> Result<HttpResponse, ApiError> {
    let filter = ReviewFilter{ product_id: Some(path.into_inner()), ..Default::default() };

    let conn = get_pooled_connection(&pool).await?;
    let reviews = list_reviews(conn, filter, Pagination::from(&query.0)).await?;

    Ok(HttpResponse::Ok().json(reviews))
}

#[tracing::instrument(
    "Get reviews of user",
    skip(pool)
)]
pub async fn get_reviews_of_user(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    user.ensure_owner_or_admin(user_id, "You can only view your own reviews")?;

    let filter = ReviewFilter{ user_id: Some(user_id), ..Default::default() };
    let conn = get_pooled_connection(&pool).await?;
    let reviews = list_reviews(conn, filter, Pagination::from(&query.0)).await?;

    Ok(HttpResponse::Ok().json(reviews))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StarQuery{
    stars: Option<String>,
    has_image: Option<bool>,
    page: Option<i64>,
    limit: Option<i64>
}

// "5,4" -> [5, 4]; blanks are skipped
pub fn parse_stars(stars: &str) -> Result<Vec<i16>, String>{
    stars.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let value = s.parse::<i64>()
                            .map_err(|_| format!("Invalid star value: {}", s))?;
            Rating::parse(value).map(|rating| rating.value())
        })
        .collect()
}

#[tracing::instrument(
    "Get reviews filtered by stars",
    skip(pool)
)]
pub async fn get_reviews_by_stars(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<StarQuery>
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let stars = match query.stars.as_deref() {
        Some(stars) => parse_stars(stars).map_err(ApiError::Validation)?,
        None => Vec::new()
    };

    let filter = ReviewFilter{
        product_id: Some(path.into_inner()),
        user_id: None,
        stars,
        has_image: query.has_image
    };
    let pagination = Pagination::from(&PageQuery{ page: query.page, limit: query.limit });

    let conn = get_pooled_connection(&pool).await?;
    let reviews = list_reviews(conn, filter, pagination).await?;

    Ok(HttpResponse::Ok().json(reviews))
}
