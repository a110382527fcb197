use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{auth::IsAdmin, db_interaction::get_all_users, error::ApiError, models::UserProfileInfo, utils::{csv_response, get_pooled_connection, DbPool}};

// CSV cells can't hold lists, addresses are joined
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserRow{
    user_id: Uuid,
    username: String,
    email: String,
    is_admin: bool,
    phone_number: Option<String>,
    gender: Option<String>,
    birth_date: Option<NaiveDate>,
    addresses: String,
    created_at: DateTime<Utc>
}

impl From<UserProfileInfo> for UserRow {
    fn from(user: UserProfileInfo) -> Self {
        UserRow{
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            phone_number: user.phone_number,
            gender: user.gender,
            birth_date: user.birth_date,
            addresses: user.addresses.join("; "),
            created_at: user.created_at
        }
    }
}

#[tracing::instrument(
    "Exporting users",
    skip(pool, _admin)
)]
pub async fn export_users(
    _admin: IsAdmin,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let conn = get_pooled_connection(&pool).await?;
    let rows: Vec<UserRow> = get_all_users(conn)
                    .await?
                    .into_iter()
                    .map(UserRow::from)
                    .collect();

    Ok(csv_response("users.csv", &rows)?)
}
