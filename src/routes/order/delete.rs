use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::{cancel_order, CancelOrderError}, error::ApiError, utils::{get_pooled_connection, DbPool}};

impl From<CancelOrderError> for ApiError {
    fn from(value: CancelOrderError) -> Self {
        match value {
            CancelOrderError::NotFound => ApiError::not_found(value.to_string()),
            CancelOrderError::NotOwner => ApiError::forbidden(value.to_string()),
            CancelOrderError::NotPending(_) => ApiError::validation(value.to_string()),
            e => ApiError::Unexpected(anyhow::Error::new(e))
        }
    }
}

#[tracing::instrument(
    "Cancelling order",
    skip(pool)
)]
pub async fn cancel_order_by_id(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>
) -> Result<HttpResponse, ApiError> {
    let (user_id, order_id) = path.into_inner();

    let conn = get_pooled_connection(&pool).await?;
    cancel_order(conn, user.user_id, user_id, order_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Order cancelled" })))
}
