use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::{get_order_with_items, get_orders_page}, domain::{PageQuery, Pagination}, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Get orders of user",
    skip(pool)
)]
pub async fn get_orders_of_user(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    user.ensure_owner_or_admin(user_id, "You can only view your own orders")?;

    let conn = get_pooled_connection(&pool).await?;
    let orders = get_orders_page(conn, Some(user_id), Pagination::from(&query.0)).await?;

    Ok(HttpResponse::Ok().json(orders))
}

#[tracing::instrument(
    "Get order by id",
    skip(pool)
)]
pub async fn get_order_by_id(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let order = get_order_with_items(conn, path.into_inner())
                    .await?
                    .ok_or_else(|| ApiError::not_found("Order not found"))?;

    user.ensure_owner_or_admin(order.order.user_id, "You can only view your own orders")?;

    Ok(HttpResponse::Ok().json(order))
}
