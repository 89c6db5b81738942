use async_trait::async_trait;
use jobboard_core::Result;
use sqlx::PgPool;

use super::{VacancyRecord, VacancyStore};
use crate::models::response::UserVacancyResponse;
use crate::models::vacancy::Vacancy;

const VACANCY_COLUMNS: &str = "id, title, description, salary, city, organization_id";
const RESPONSE_COLUMNS: &str = "id, user_id, vacancy_id, response_date";

pub struct PgVacancyStore {
    pool: PgPool,
}

impl PgVacancyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VacancyStore for PgVacancyStore {
    async fn insert(&self, record: VacancyRecord) -> Result<Vacancy> {
        let vacancy = sqlx::query_as::<_, Vacancy>(&format!(
            r#"
            INSERT INTO vacancies (title, description, salary, city, organization_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {VACANCY_COLUMNS}
            "#
        ))
        .bind(record.title)
        .bind(record.description)
        .bind(record.salary)
        .bind(record.city)
        .bind(record.organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(vacancy)
    }

    async fn update(&self, id: i64, record: VacancyRecord) -> Result<Option<Vacancy>> {
        let vacancy = sqlx::query_as::<_, Vacancy>(&format!(
            r#"
            UPDATE vacancies
            SET title = $2, description = $3, salary = $4, city = $5, organization_id = $6
            WHERE id = $1
            RETURNING {VACANCY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(record.title)
        .bind(record.description)
        .bind(record.salary)
        .bind(record.city)
        .bind(record.organization_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vacancy)
    }

    async fn find(&self, id: i64) -> Result<Option<Vacancy>> {
        let vacancy = sqlx::query_as::<_, Vacancy>(&format!(
            "SELECT {VACANCY_COLUMNS} FROM vacancies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(vacancy)
    }

    async fn list(
        &self,
        organization_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Vacancy>, i64)> {
        let (items, total) = match organization_id {
            Some(org_id) => {
                let items = sqlx::query_as::<_, Vacancy>(&format!(
                    r#"
                    SELECT {VACANCY_COLUMNS} FROM vacancies
                    WHERE organization_id = $1
                    ORDER BY id
                    LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(org_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM vacancies WHERE organization_id = $1",
                )
                .bind(org_id)
                .fetch_one(&self.pool)
                .await?;

                (items, total)
            }
            None => {
                let items = sqlx::query_as::<_, Vacancy>(&format!(
                    "SELECT {VACANCY_COLUMNS} FROM vacancies ORDER BY id LIMIT $1 OFFSET $2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vacancies")
                    .fetch_one(&self.pool)
                    .await?;

                (items, total)
            }
        };

        Ok((items, total))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vacancies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_response(&self, user_id: i64, vacancy_id: i64) -> Result<UserVacancyResponse> {
        // Delete-then-insert in one transaction so a repeated respond ends
        // up as exactly one row carrying the latest timestamp.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_vacancy_responses WHERE user_id = $1 AND vacancy_id = $2")
            .bind(user_id)
            .bind(vacancy_id)
            .execute(&mut *tx)
            .await?;

        let response = sqlx::query_as::<_, UserVacancyResponse>(&format!(
            r#"
            INSERT INTO user_vacancy_responses (user_id, vacancy_id, response_date)
            VALUES ($1, $2, NOW())
            RETURNING {RESPONSE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(vacancy_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(response)
    }

    async fn remove_response(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM user_vacancy_responses WHERE user_id = $1 AND vacancy_id = $2")
            .bind(user_id)
            .bind(vacancy_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn responses_for_user(&self, user_id: i64) -> Result<Vec<UserVacancyResponse>> {
        let responses = sqlx::query_as::<_, UserVacancyResponse>(&format!(
            r#"
            SELECT {RESPONSE_COLUMNS} FROM user_vacancy_responses
            WHERE user_id = $1
            ORDER BY vacancy_id
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(responses)
    }

    async fn responses_for_vacancy(&self, vacancy_id: i64) -> Result<Vec<UserVacancyResponse>> {
        let responses = sqlx::query_as::<_, UserVacancyResponse>(&format!(
            r#"
            SELECT {RESPONSE_COLUMNS} FROM user_vacancy_responses
            WHERE vacancy_id = $1
            ORDER BY user_id
            "#
        ))
        .bind(vacancy_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(responses)
    }

    async fn response_for_pair(
        &self,
        user_id: i64,
        vacancy_id: i64,
    ) -> Result<Option<UserVacancyResponse>> {
        let response = sqlx::query_as::<_, UserVacancyResponse>(&format!(
            r#"
            SELECT {RESPONSE_COLUMNS} FROM user_vacancy_responses
            WHERE user_id = $1 AND vacancy_id = $2
            "#
        ))
        .bind(user_id)
        .bind(vacancy_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(response)
    }
}
