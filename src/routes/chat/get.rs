use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::{get_admins, get_chat_partners, get_conversation}, domain::{PageQuery, Pagination}, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Get conversation",
    skip(pool)
)]
pub async fn get_conversation_with(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let messages = get_conversation(conn, user.user_id, path.into_inner(), Pagination::from(&query.0)).await?;

    Ok(HttpResponse::Ok().json(messages))
}

/// Regular users talk to admins; admins see whoever has talked to them.
#[tracing::instrument(
    "Get chat recipients",
    skip(pool)
)]
pub async fn get_chat_recipients(
    user: AuthUser,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let recipients = if user.is_admin {
        get_chat_partners(conn, user.user_id).await?
    } else {
        get_admins(conn).await?
    };

    Ok(HttpResponse::Ok().json(recipients))
}
