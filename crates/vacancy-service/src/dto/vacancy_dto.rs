use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Shared by create and update; updates replace the full record, as the
/// owning service treats PUT as a whole-entity write.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VacancyPayload {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 0))]
    pub salary: Option<i32>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    pub organization_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VacancyListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub organization_id: Option<i64>,
}

/// Response-relation query params keep the original camelCase wire names.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseParams {
    #[serde(rename = "vacancyId")]
    pub vacancy_id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponseQuery {
    #[serde(rename = "vacancyId")]
    pub vacancy_id: Option<i64>,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
}
