use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// At most one row exists per (user_id, vacancy_id); responding again
/// replaces the row with a fresh timestamp.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserVacancyResponse {
    pub id: i64,
    pub user_id: i64,
    pub vacancy_id: i64,
    pub response_date: DateTime<Utc>,
}
