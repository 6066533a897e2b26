//! Session authentication endpoints and the guard for protected routes.
//!
//! A successful login cycles the session id and stores the user's id under
//! [`USER_ID_KEY`]. The session record lives in the database, so it survives
//! restarts until it expires from inactivity.

use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::constants::session::USER_ID_KEY;
use crate::domain::UserId;
use crate::models::{LoginRequest, SignupRequest, UserInfo};
use crate::services::AuthError;

/// The authenticated caller, inserted by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub profile: UserInfo,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                Self::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::AlreadyExists(email) => {
                Self::Conflict(format!("User already exists with email {email}"))
            }
            AuthError::UserNotFound => Self::unauthenticated(),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a live session and exposes the caller as a
/// [`CurrentUser`] extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = session
        .get::<i32>(USER_ID_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read session: {e}")))?
        .map(UserId::new)
        .ok_or_else(ApiError::unauthenticated)?;

    let profile = match state.auth_service().current_user(user_id).await {
        Ok(profile) => profile,
        Err(AuthError::UserNotFound) => {
            // The account behind this session no longer exists.
            if let Err(e) = session.flush().await {
                tracing::warn!(user_id = user_id.value(), "Failed to flush session: {e}");
            }
            return Err(ApiError::unauthenticated());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::Span::current().record("user_id", user_id.value());

    request.extensions_mut().insert(CurrentUser {
        id: user_id,
        profile,
    });

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let user = state.auth_service().signup(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// POST /auth/login
/// Verifies credentials and binds the session to the account.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let Json(payload) = payload?;
    let user = state.auth_service().login(payload).await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to cycle session: {e}")))?;
    session
        .insert(USER_ID_KEY, user.id.value())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/logout
/// Deletes the session record and expires the cookie. Succeeds without a session too.
pub async fn logout(session: Session) -> Json<ApiResponse<MessageResponse>> {
    if let Err(e) = session.flush().await {
        tracing::warn!("Failed to flush session: {e}");
    }
    Json(ApiResponse::success(MessageResponse::new(
        "Logged out successfully",
    )))
}

/// GET /user
pub async fn get_current_user(
    Extension(user): Extension<CurrentUser>,
) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::success(user.profile))
}
