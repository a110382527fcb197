use actix_web::{web, HttpResponse};
use anyhow::Context;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Tokenizer, db_interaction::get_user_from_email, domain::UserEmail, error::ApiError, password::verify_password, utils::{get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct LoginForm{
    pub email: String,
    pub password: SecretString
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse{
    pub token: String,
    pub user_id: Uuid,
    pub is_admin: bool
}

#[tracing::instrument(
    "Logging in user",
    skip(pool, tokenizer, form)
)]
pub async fn login(
    pool: web::Data<DbPool>,
    tokenizer: web::Data<Tokenizer>,
    form: web::Json<LoginForm>
) -> Result<HttpResponse, ApiError>{
    let form = form.into_inner();
    let email = UserEmail::parse(form.email)
                    .map_err(ApiError::Validation)?;

    let conn = get_pooled_connection(&pool).await?;
    let user = match get_user_from_email(conn, email.inner()).await? {
        Some(user) => user,
        None => {
            tracing::info!("No user registered with this email");
            return Err(ApiError::Unauthenticated("Email or password is incorrect".into()))
        }
    };

    if !verify_password(form.password, user.password.clone()).await? {
        tracing::info!("Passwords did not match");
        return Err(ApiError::Unauthenticated("Email or password is incorrect".into()))
    }

    let token = tokenizer.generate_key(user.user_id, &user.email, user.is_admin)
                    .context("Failed to sign token")?;

    Ok(HttpResponse::Ok().json(LoginResponse{
        token,
        user_id: user.user_id,
        is_admin: user.is_admin
    }))
}
