//! Domain service for accounts and credentials.
//!
//! Handles signup, credential checks at login, and loading the profile of the
//! session's user. Session bookkeeping itself lives in the HTTP layer.

use thiserror::Error;

use crate::domain::UserId;
use crate::models::{LoginRequest, SignupRequest, UserInfo};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists with email {0}")]
    AlreadyExists(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// - Returns [`AuthError::Validation`] if the request is malformed
    /// - Returns [`AuthError::AlreadyExists`] if the email is registered
    async fn signup(&self, request: SignupRequest) -> Result<UserInfo, AuthError>;

    /// Verifies credentials and returns the matching account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a wrong password.
    async fn login(&self, request: LoginRequest) -> Result<UserInfo, AuthError>;

    /// Loads the account bound to a session.
    async fn current_user(&self, id: UserId) -> Result<UserInfo, AuthError>;
}
