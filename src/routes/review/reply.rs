use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::IsAdmin, db_interaction::reply_to_review, error::ApiError, utils::{get_pooled_connection, DbPool}};

use super::MAX_REPLY_LENGTH;

#[derive(Deserialize, Debug)]
pub struct ReplyForm{
    #[serde(default)]
    reply: String
}

pub fn validate_reply(reply: &str) -> Result<String, String>{
    let reply = reply.trim();
    if reply.is_empty() {
        return Err("Reply is required".into())
    }
    if reply.chars().count() > MAX_REPLY_LENGTH {
        return Err(format!("Reply must be at most {} characters", MAX_REPLY_LENGTH))
    }
    Ok(reply.to_string())
}

#[tracing::instrument(
    "Replying to review",
    skip(pool, form, _admin)
)]
pub async fn reply_review(
    _admin: IsAdmin,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    form: web::Json<ReplyForm>
) -> Result<HttpResponse, ApiError> {
    let reply = validate_reply(&form.reply).map_err(ApiError::Validation)?;

    let conn = get_pooled_connection(&pool).await?;
    let review = reply_to_review(conn, path.into_inner(), reply)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Review not found"))?;

    Ok(HttpResponse::Ok().json(review))
}
