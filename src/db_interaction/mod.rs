use std::{error::Error, fmt::Debug};

use thiserror::Error;

use crate::{error::ApiError, utils::error_fmt_chain};

pub mod chats;
pub mod order_stats;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod user;

pub use chats::*;
pub use order_stats::*;
pub use orders::*;
pub use products::*;
pub use reviews::*;
pub use user::*;

// Failure of a plain read / write with no domain outcome of its own
#[derive(Error)]
pub enum QueryError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl From<QueryError> for ApiError {
    fn from(value: QueryError) -> Self {
        ApiError::Unexpected(anyhow::Error::new(value))
    }
}

pub(crate) fn is_unique_violation(error: &diesel::result::Error) -> bool{
    matches!(
        error,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        )
    )
}

// `%key%` for ILIKE with the key's own wildcards matched literally
pub(crate) fn contains_pattern(key: &str) -> String{
    let escaped = key.replace('\\', "\\\\")
                     .replace('%', "\\%")
                     .replace('_', "\\_");
    format!("%{}%", escaped)
}
