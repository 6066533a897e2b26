//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::info;
use validator::Validate;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::UserId;
use crate::models::user::normalize_email;
use crate::models::validation::join_messages;
use crate::models::{LoginRequest, SignupRequest, UserInfo};
use crate::services::auth_service::{AuthError, AuthService};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(&self, request: SignupRequest) -> Result<UserInfo, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(join_messages(&e)))?;

        let email = normalize_email(&request.email);

        if self.store.email_exists(&email).await? {
            return Err(AuthError::AlreadyExists(email));
        }

        // A concurrent signup can still win the race; the unique index decides.
        let user = self
            .store
            .create_user(request.name.trim(), &email, &request.password, &self.security)
            .await?
            .ok_or_else(|| AuthError::AlreadyExists(email.clone()))?;

        info!(user_id = %user.id, "Account created");
        Ok(UserInfo::from(user))
    }

    async fn login(&self, request: LoginRequest) -> Result<UserInfo, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(join_messages(&e)))?;

        let email = normalize_email(&request.email);

        let user = self
            .store
            .verify_user_credentials(&email, &request.password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(UserInfo::from(user))
    }

    async fn current_user(&self, id: UserId) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo::from(user))
    }
}
