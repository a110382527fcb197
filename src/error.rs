use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::utils::{error_fmt_chain, PoolGetError};

// Error returned by every handler, rendered as {"message": ...}
#[derive(thiserror::Error)]
pub enum ApiError{
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Unexpected(#[from] anyhow::Error)
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self{
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self{
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self{
        Self::Forbidden(message.into())
    }
}

impl Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl From<PoolGetError> for ApiError {
    fn from(value: PoolGetError) -> Self {
        ApiError::Unexpected(anyhow::Error::new(value).context("Failed to get a database connection"))
    }
}

#[derive(Serialize)]
pub struct ErrorBody<'a>{
    pub message: &'a str
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        if let ApiError::Unexpected(e) = self {
            tracing::error!(error = ?e, "Request failed with an unexpected error");
        }

        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody{ message: &message })
    }
}
