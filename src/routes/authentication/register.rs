use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{db_interaction::{insert_user_into_database, UserInsertError}, domain::UserEmail, error::ApiError, password::{hash_password, MIN_PASSWORD_LENGTH}, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm{
    #[serde(default)]
    username: String,
    email: String,
    password: SecretString,
    confirm_password: SecretString
}

// Email stays out of logs along with the passwords
impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[tracing::instrument(
    "User registration started",
    skip(pool, form),
    fields(user_id = tracing::field::Empty)
)]
pub async fn register(
    form: web::Json<RegistrationForm>,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();

    let username = form.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::validation("Username is required"))
    }

    let email = UserEmail::parse(form.email)
                    .map_err(ApiError::Validation)?;

    if form.password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )))
    }

    if form.password.expose_secret() != form.confirm_password.expose_secret(){
        return Err(ApiError::validation("The password and confirm password don't match"))
    }

    let password_hash = hash_password(form.password)
                            .await
                            .context("Failed to hash password")?;

    let conn = get_pooled_connection(&pool).await?;
    let user = insert_user_into_database(conn, username, email.inner(), password_hash, false)
        .await
        .map_err(|e| match e {
            UserInsertError::EmailNotUnique(_) => ApiError::validation(e.to_string()),
            UserInsertError::QueryError(_) => ApiError::Unexpected(anyhow::Error::new(e))
        })?;

    tracing::Span::current().record("user_id", tracing::field::display(&user.user_id));
    tracing::info!("Registered new user");
    Ok(HttpResponse::Created().json(user))
}
