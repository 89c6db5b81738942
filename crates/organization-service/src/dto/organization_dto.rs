use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrganizationPayload {
    #[validate(length(min = 1, max = 50))]
    pub nickname: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    /// Defaults to the caller; naming another user requires SUPERVISOR.
    pub director: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganizationPayload {
    #[validate(length(min = 1, max = 50))]
    pub nickname: Option<String>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    pub director: Option<i64>,
}
