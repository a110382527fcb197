use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::delete_user_from_database, error::ApiError, utils::{get_pooled_connection, DbPool}};

#[tracing::instrument(
    "Deleting user",
    skip(pool)
)]
pub async fn delete_user(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    user.ensure_owner_or_admin(user_id, "You can only delete your own account")?;

    let conn = get_pooled_connection(&pool).await?;
    if !delete_user_from_database(conn, user_id).await? {
        return Err(ApiError::not_found("User not found"))
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted" })))
}
