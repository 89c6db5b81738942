use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::user::User;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(length(min = 1, max = 50))]
    pub nickname: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(max = 512))]
    pub cv_link: Option<String>,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Full-replace profile update; the password is changed through a separate
/// flow and roles only through supervisor bootstrap.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, max = 50))]
    pub nickname: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(max = 512))]
    pub cv_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub cv_link: Option<String>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            nickname: value.nickname,
            email: value.email,
            cv_link: value.cv_link,
        }
    }
}
