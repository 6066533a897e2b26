use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::not_blank;
use crate::domain::UserId;
use crate::entities::users;

/// User data returned from the repository (without the password hash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: UserId::new(model.id),
            name: model.name,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Public profile, returned by signup and `GET /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Please enter a valid name"))]
    pub name: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Please enter your email"),
        email(message = "Please enter a valid email address")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Please enter your password"),
        length(
            min = 5,
            max = 10,
            message = "Password length must be between 5 and 10 characters"
        )
    )]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please enter valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Please enter your password"))]
    pub password: String,
}

/// Emails are compared case-insensitively; store and look them up lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
