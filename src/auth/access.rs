use uuid::Uuid;

use crate::error::ApiError;

use super::extractors::AuthUser;

/// How a requester relates to a resource owned by some user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access{
    Owner,
    Admin,
    Stranger
}

impl Access {
    pub fn of(requester: &AuthUser, owner_id: Uuid) -> Access{
        if requester.user_id == owner_id {
            Access::Owner
        } else if requester.is_admin {
            Access::Admin
        } else {
            Access::Stranger
        }
    }
}

impl AuthUser {
    // Owner or admin may read and mutate; everyone else gets 403
    pub fn ensure_owner_or_admin(&self, owner_id: Uuid, message: &str) -> Result<Access, ApiError>{
        match Access::of(self, owner_id) {
            Access::Stranger => Err(ApiError::forbidden(message)),
            access => Ok(access)
        }
    }

    // Only the user themself, admins included in the restriction
    pub fn ensure_self(&self, user_id: Uuid, message: &str) -> Result<(), ApiError>{
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(ApiError::forbidden(message))
        }
    }
}
