use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::{get_user_profile_info, insert_chat_message}, error::ApiError, utils::{get_pooled_connection, DbPool}};

use super::MAX_MESSAGE_LENGTH;

#[derive(Deserialize, Debug)]
pub struct MessageForm{
    #[serde(default)]
    content: String
}

pub fn validate_content(content: &str) -> Result<String, String>{
    let content = content.trim();
    if content.is_empty() {
        return Err("Message content is required".into())
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(format!("Message must be at most {} characters", MAX_MESSAGE_LENGTH))
    }
    Ok(content.to_string())
}

#[tracing::instrument(
    "Sending chat message",
    skip(pool, form),
    fields(sender_id = %user.user_id)
)]
pub async fn post_message(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    form: web::Json<MessageForm>
) -> Result<HttpResponse, ApiError> {
    let recipient_id = path.into_inner();
    let content = validate_content(&form.content).map_err(ApiError::Validation)?;

    if recipient_id == user.user_id {
        return Err(ApiError::validation("You cannot send a message to yourself"))
    }

    get_user_profile_info(get_pooled_connection(&pool).await?, recipient_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipient not found"))?;

    let conn = get_pooled_connection(&pool).await?;
    let message = insert_chat_message(conn, user.user_id, recipient_id, content).await?;

    Ok(HttpResponse::Created().json(message))
}
