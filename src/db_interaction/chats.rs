use std::collections::HashSet;

use chrono::Utc;
use diesel::{BoolExpressionMethods, ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};
use uuid::Uuid;

use crate::{domain::Pagination, models::{ChatMessage, Paginated, UserProfileInfo}, schema::{chat_messages, users}, telemetry::spawn_blocking_with_tracing, utils::DbConnection};

use super::QueryError;

#[tracing::instrument(
    "Storing chat message",
    skip(conn, content)
)]
pub async fn insert_chat_message(
    mut conn: DbConnection,
    sender_id: Uuid,
    recipient_id: Uuid,
    content: String
) -> Result<ChatMessage, QueryError>{
    let message = ChatMessage{
        message_id: Uuid::new_v4(),
        sender_id,
        recipient_id,
        content,
        created_at: Utc::now()
    };

    let res = spawn_blocking_with_tracing(move || {
        diesel::insert_into(chat_messages::table)
            .values(&message)
            .returning(ChatMessage::as_returning())
            .get_result::<ChatMessage>(&mut conn)
    })
    .await??;

    Ok(res)
}

/// Messages exchanged between two users, oldest first.
#[tracing::instrument(
    "Loading conversation",
    skip(conn)
)]
pub async fn get_conversation(
    mut conn: DbConnection,
    user_id: Uuid,
    other_user_id: Uuid,
    pagination: Pagination
) -> Result<Paginated<ChatMessage>, QueryError>{
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let between = chat_messages::sender_id.eq(user_id)
                .and(chat_messages::recipient_id.eq(other_user_id))
            .or(chat_messages::sender_id.eq(other_user_id)
                .and(chat_messages::recipient_id.eq(user_id)));

        let total = chat_messages::table
            .filter(between)
            .count()
            .get_result::<i64>(&mut conn)?;

        let data = chat_messages::table
            .filter(between)
            .select(ChatMessage::as_select())
            .order(chat_messages::created_at.asc())
            .limit(pagination.limit)
            .offset(pagination.offset())
            .load::<ChatMessage>(&mut conn)?;

        Ok(Paginated{ data, page: pagination.page, limit: pagination.limit, total })
    })
    .await??;

    Ok(res)
}

/// Every user who has sent a message to, or received one from, `user_id`.
#[tracing::instrument(
    "Loading chat partners",
    skip(conn)
)]
pub async fn get_chat_partners(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<Vec<UserProfileInfo>, QueryError>{
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let pairs = chat_messages::table
            .filter(chat_messages::sender_id.eq(user_id).or(chat_messages::recipient_id.eq(user_id)))
            .select((chat_messages::sender_id, chat_messages::recipient_id))
            .distinct()
            .load::<(Uuid, Uuid)>(&mut conn)?;

        let partner_ids: HashSet<Uuid> = pairs.into_iter()
            .map(|(sender, recipient)| if sender == user_id { recipient } else { sender })
            .filter(|id| *id != user_id)
            .collect();

        users::table
            .filter(users::user_id.eq_any(partner_ids.into_iter().collect::<Vec<_>>()))
            .select(UserProfileInfo::as_select())
            .order(users::username.asc())
            .load::<UserProfileInfo>(&mut conn)
    })
    .await??;

    Ok(res)
}
