use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::{db_interaction::{get_product, get_products}, domain::{PageQuery, Pagination}, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Get product page",
    skip(pool)
)]
pub async fn get_products_page(
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let products = get_products(conn, Pagination::from(&query.0)).await?;

    Ok(HttpResponse::Ok().json(products))
}

#[tracing::instrument(
    "Get product by id",
    skip(pool)
)]
pub async fn get_product_by_id(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let product = get_product(conn, path.into_inner())
                    .await?
                    .ok_or_else(|| ApiError::not_found("Product not found"))?;

    Ok(HttpResponse::Ok().json(product))
}
