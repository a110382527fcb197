use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::{AuthUser, IsAdmin}, db_interaction::{get_user_profile_info, list_users}, domain::{PageQuery, Pagination}, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct UserSearchQuery{
    search: Option<String>,
    page: Option<i64>,
    limit: Option<i64>
}

#[tracing::instrument(
    "Get users page",
    skip(pool, _admin)
)]
pub async fn get_users_page(
    _admin: IsAdmin,
    pool: web::Data<DbPool>,
    query: web::Query<UserSearchQuery>
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let pagination = Pagination::from(&PageQuery{ page: query.page, limit: query.limit });

    let conn = get_pooled_connection(&pool).await?;
    let users = list_users(conn, query.search, pagination).await?;

    Ok(HttpResponse::Ok().json(users))
}

#[tracing::instrument(
    "Get user profile",
    skip(pool)
)]
pub async fn get_user_by_id(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    user.ensure_owner_or_admin(user_id, "You can only view your own profile")?;

    let conn = get_pooled_connection(&pool).await?;
    let profile = get_user_profile_info(conn, user_id)
                    .await?
                    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(profile))
}
