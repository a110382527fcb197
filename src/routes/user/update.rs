use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::AuthUser, db_interaction::{post_user_profile_info, PostUserProfileInfoError, UserChangeset}, domain::{receiver::validate_shipping_address, PhoneNumberDomain, UserEmail}, error::ApiError, utils::{get_pooled_connection, DbPool}};

const GENDERS: [&str; 3] = ["male", "female", "other"];

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm{
    username: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    gender: Option<String>,
    birth_date: Option<NaiveDate>,
    addresses: Option<Vec<String>>
}

impl TryFrom<ProfileForm> for UserChangeset {
    type Error = String;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
        let username = form.username
                        .map(|name| name.trim().to_string())
                        .map(|name| if name.is_empty() { Err("Username is required".to_string()) } else { Ok(name) })
                        .transpose()?;

        let email = form.email
                        .map(UserEmail::parse)
                        .transpose()?
                        .map(|email| email.inner());

        let phone_number = form.phone_number
                        .map(PhoneNumberDomain::parse)
                        .transpose()?
                        .map(|phone| phone.inner());

        let gender = form.gender
                        .map(|gender| gender.trim().to_lowercase())
                        .map(|gender| if GENDERS.contains(&gender.as_str()) {
                            Ok(gender)
                        } else {
                            Err(format!("{} is not a valid gender", gender))
                        })
                        .transpose()?;

        let addresses = form.addresses
                        .map(|addresses| addresses.into_iter()
                            .map(|address| validate_shipping_address(&address).map(|_| address.trim().to_string()))
                            .collect::<Result<Vec<_>, _>>())
                        .transpose()?;

        Ok(UserChangeset{
            username,
            email,
            phone_number,
            gender,
            birth_date: form.birth_date,
            addresses
        })
    }
}

impl From<PostUserProfileInfoError> for ApiError {
    fn from(value: PostUserProfileInfoError) -> Self {
        match value {
            PostUserProfileInfoError::EmailNotUnique(_) => ApiError::validation(value.to_string()),
            e => ApiError::Unexpected(anyhow::Error::new(e))
        }
    }
}

#[tracing::instrument(
    "Updating user profile",
    skip(pool, form)
)]
pub async fn update_user(
    user: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    form: web::Json<ProfileForm>
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    user.ensure_owner_or_admin(user_id, "You can only edit your own profile")?;

    let changes = UserChangeset::try_from(form.into_inner())
                    .map_err(ApiError::Validation)?;

    let conn = get_pooled_connection(&pool).await?;
    let profile = post_user_profile_info(conn, user_id, changes)
                    .await?
                    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(profile))
}
