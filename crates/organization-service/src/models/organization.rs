use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// `director` names a user owned by the user service. It is a soft
/// reference: stored as a plain id and never validated against the user
/// service at write time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Organization {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub director: i64,
}
