use models::errors::ModelError;
use thiserror::Error;

use crate::auth::errors::AuthError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{entity} not found")) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Unauthorized(_) => 1004,
            ServiceError::Forbidden(_) => 1005,
            ServiceError::Hash(_) => 1101,
            ServiceError::Token(_) => 1102,
            ServiceError::Db(_) => 1200,
        }
    }

    /// Failures the caller cannot fix by changing the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Hash(_) | ServiceError::Token(_) | ServiceError::Db(_))
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Conflict(detail) => {
                tracing::debug!(%detail, "unique constraint violated");
                ServiceError::Conflict("user with this email already exists".into())
            }
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthorized => ServiceError::Unauthorized("invalid email or password".into()),
            AuthError::Expired => ServiceError::Unauthorized("token expired".into()),
            AuthError::InvalidToken(_) => ServiceError::Unauthorized("invalid or expired token".into()),
            AuthError::HashError(msg) => ServiceError::Hash(msg),
            AuthError::TokenError(msg) => ServiceError::Token(msg),
        }
    }
}
