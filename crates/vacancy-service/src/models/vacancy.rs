use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// `organization_id` names an organization owned by the organization
/// service. It is validated through the reference client at create/update
/// time only; deleting the organization later leaves the vacancy dangling.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vacancy {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub salary: Option<i32>,
    pub city: Option<String>,
    pub organization_id: i64,
}
