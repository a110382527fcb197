use std::{error::Error, fmt::Debug};

use chrono::{NaiveDate, Utc};
use diesel::prelude::AsChangeset;
use diesel::{BoolExpressionMethods, ExpressionMethods, OptionalExtension, PgTextExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use uuid::Uuid;

use crate::{domain::Pagination, models::{Paginated, User, UserProfileInfo}, schema::users, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

use super::{contains_pattern, is_unique_violation, QueryError};

// Function to query user from email id
#[tracing::instrument(
    "Getting user by email",
    skip(conn, email)
)]
pub async fn get_user_from_email(
    mut conn: DbConnection,
    email: String
) -> Result<Option<User>, QueryError> {
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .select(User::as_select())
            .filter(users::email.eq(email))
            .first::<User>(&mut conn)
            .optional()
    })
    .await??;

    Ok(res)
}

// Error associated with inserting user to users table
#[derive(Error)]
pub enum UserInsertError{
    #[error("A user with this email already exists")]
    EmailNotUnique(#[source] diesel::result::Error),
    #[error("Failed to insert user")]
    QueryError(#[from] QueryError)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting user into the database",
    skip(conn, email, password_hash)
)]
pub async fn insert_user_into_database(
    mut conn: DbConnection,
    username: String,
    email: String,
    password_hash: SecretString,
    is_admin: bool
) -> Result<UserProfileInfo, UserInsertError> {
    let user = User{
        user_id: Uuid::new_v4(),
        username,
        email,
        password: password_hash.expose_secret().to_string(),
        is_admin,
        phone_number: None,
        gender: None,
        birth_date: None,
        addresses: Vec::new(),
        created_at: Utc::now()
    };

    spawn_blocking_with_tracing(move || {
        diesel::insert_into(users::table)
            .values(&user)
            .returning(UserProfileInfo::as_returning())
            .get_result::<UserProfileInfo>(&mut conn)
    })
    .await
    .map_err(|e| UserInsertError::QueryError(e.into()))?
    .map_err(|e| {
        if is_unique_violation(&e) {
            UserInsertError::EmailNotUnique(e)
        } else {
            UserInsertError::QueryError(e.into())
        }
    })
}

#[tracing::instrument(
    "Get profile data of user",
    skip(conn)
)]
pub async fn get_user_profile_info(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<Option<UserProfileInfo>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .find(user_id)
            .select(UserProfileInfo::as_select())
            .first::<UserProfileInfo>(&mut conn)
            .optional()
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Listing users",
    skip(conn)
)]
pub async fn list_users(
    mut conn: DbConnection,
    search: Option<String>,
    pagination: Pagination
) -> Result<Paginated<UserProfileInfo>, QueryError>{
    let res = spawn_blocking_with_tracing(move || -> Result<_, diesel::result::Error> {
        let pattern = search
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .map(|s| contains_pattern(&s));

        let mut count_query = users::table.into_boxed();
        let mut data_query = users::table.into_boxed();
        if let Some(pattern) = pattern {
            count_query = count_query.filter(
                users::username.ilike(pattern.clone()).or(users::email.ilike(pattern.clone()))
            );
            data_query = data_query.filter(
                users::username.ilike(pattern.clone()).or(users::email.ilike(pattern))
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)?;
        let data = data_query
            .select(UserProfileInfo::as_select())
            .order(users::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset())
            .load::<UserProfileInfo>(&mut conn)?;

        Ok(Paginated{ data, page: pagination.page, limit: pagination.limit, total })
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Loading every user",
    skip(conn)
)]
pub async fn get_all_users(
    mut conn: DbConnection
) -> Result<Vec<UserProfileInfo>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .select(UserProfileInfo::as_select())
            .order(users::created_at.asc())
            .load::<UserProfileInfo>(&mut conn)
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Loading admins",
    skip(conn)
)]
pub async fn get_admins(
    mut conn: DbConnection
) -> Result<Vec<UserProfileInfo>, QueryError>{
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .filter(users::is_admin.eq(true))
            .select(UserProfileInfo::as_select())
            .load::<UserProfileInfo>(&mut conn)
    })
    .await??;

    Ok(res)
}

// Partial profile update; `None` keeps the stored value
#[derive(AsChangeset, Debug, Default, Clone)]
#[diesel(table_name = users)]
pub struct UserChangeset{
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub addresses: Option<Vec<String>>
}

impl UserChangeset {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.gender.is_none()
            && self.birth_date.is_none()
            && self.addresses.is_none()
    }
}

// Errors associated with updating user profile in database
#[derive(thiserror::Error)]
pub enum PostUserProfileInfoError{
    #[error("A user with this email already exists")]
    EmailNotUnique(#[source] diesel::result::Error),
    #[error("Failed to update user profile")]
    QueryError(#[from] QueryError)
}

impl Debug for PostUserProfileInfoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "posting user profile info to db",
    skip(conn)
)]
pub async fn post_user_profile_info(
    mut conn: DbConnection,
    user_id: Uuid,
    changes: UserChangeset
) -> Result<Option<UserProfileInfo>, PostUserProfileInfoError>{
    spawn_blocking_with_tracing(move || {
        if changes.is_empty() {
            return users::table
                .find(user_id)
                .select(UserProfileInfo::as_select())
                .first::<UserProfileInfo>(&mut conn)
                .optional();
        }

        diesel::update(users::table.find(user_id))
            .set(&changes)
            .returning(UserProfileInfo::as_returning())
            .get_result::<UserProfileInfo>(&mut conn)
            .optional()
    })
    .await
    .map_err(|e| PostUserProfileInfoError::QueryError(e.into()))?
    .map_err(|e| {
        if is_unique_violation(&e) {
            PostUserProfileInfoError::EmailNotUnique(e)
        } else {
            PostUserProfileInfoError::QueryError(e.into())
        }
    })
}

#[tracing::instrument(
    "Deleting user",
    skip(conn)
)]
pub async fn delete_user_from_database(
    mut conn: DbConnection,
    user_id: Uuid
) -> Result<bool, QueryError>{
    let affected_rows = spawn_blocking_with_tracing(move || {
        diesel::delete(users::table.find(user_id))
            .execute(&mut conn)
    })
    .await??;

    Ok(affected_rows > 0)
}
