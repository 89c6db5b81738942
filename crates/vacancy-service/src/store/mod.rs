use async_trait::async_trait;
use jobboard_core::Result;

use crate::models::response::UserVacancyResponse;
use crate::models::vacancy::Vacancy;

mod memory;
mod postgres;

pub use memory::MemoryVacancyStore;
pub use postgres::PgVacancyStore;

#[derive(Debug, Clone)]
pub struct VacancyRecord {
    pub title: String,
    pub description: String,
    pub salary: Option<i32>,
    pub city: Option<String>,
    pub organization_id: i64,
}

#[async_trait]
pub trait VacancyStore: Send + Sync {
    async fn insert(&self, record: VacancyRecord) -> Result<Vacancy>;
    async fn update(&self, id: i64, record: VacancyRecord) -> Result<Option<Vacancy>>;
    async fn find(&self, id: i64) -> Result<Option<Vacancy>>;
    async fn list(
        &self,
        organization_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Vacancy>, i64)>;
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Replaces any existing (user, vacancy) row with a fresh-timestamp one;
    /// retrying yields the same single-row end state.
    async fn upsert_response(&self, user_id: i64, vacancy_id: i64) -> Result<UserVacancyResponse>;
    async fn remove_response(&self, user_id: i64, vacancy_id: i64) -> Result<()>;
    async fn responses_for_user(&self, user_id: i64) -> Result<Vec<UserVacancyResponse>>;
    async fn responses_for_vacancy(&self, vacancy_id: i64) -> Result<Vec<UserVacancyResponse>>;
    async fn response_for_pair(
        &self,
        user_id: i64,
        vacancy_id: i64,
    ) -> Result<Option<UserVacancyResponse>>;
}
