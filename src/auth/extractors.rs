use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::error::ApiError;

use super::jwt::{Tokenizer, UserRole};

// Any authenticated requester
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser{
    pub user_id: Uuid,
    pub is_admin: bool
}

// Authenticated requester holding the admin role
#[derive(Debug, Clone, Copy)]
pub struct IsAdmin(pub Uuid);

fn bearer_token(req: &HttpRequest) -> Option<&str>{
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError>{
    let tokenizer = req.app_data::<web::Data<Tokenizer>>()
                        .ok_or_else(|| anyhow::anyhow!("Tokenizer is not registered as app data"))?;

    let token = bearer_token(req)
                    .ok_or_else(|| ApiError::Unauthenticated("Missing bearer token".into()))?;

    let claims = tokenizer.decode_key(token)
                    .ok_or_else(|| ApiError::Unauthenticated("Invalid token".into()))?;

    Ok(AuthUser{
        user_id: claims.sub,
        is_admin: claims.role == UserRole::ADMIN
    })
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for IsAdmin {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(authenticate(req).and_then(|user| {
            if user.is_admin {
                Ok(IsAdmin(user.user_id))
            } else {
                Err(ApiError::forbidden("Admin role required"))
            }
        }))
    }
}
