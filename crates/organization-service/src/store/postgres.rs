use async_trait::async_trait;
use jobboard_core::Result;
use sqlx::PgPool;

use super::{NewOrganization, OrganizationChanges, OrganizationStore};
use crate::models::organization::Organization;

pub struct PgOrganizationStore {
    pool: PgPool,
}

impl PgOrganizationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationStore for PgOrganizationStore {
    async fn insert(&self, new: NewOrganization) -> Result<Organization> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (nickname, email, director)
            VALUES ($1, $2, $3)
            RETURNING id, nickname, email, director
            "#,
        )
        .bind(new.nickname)
        .bind(new.email)
        .bind(new.director)
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn update(&self, id: i64, changes: OrganizationChanges) -> Result<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations
            SET
                nickname = COALESCE($2, nickname),
                email = COALESCE($3, email),
                director = COALESCE($4, director)
            WHERE id = $1
            RETURNING id, nickname, email, director
            "#,
        )
        .bind(id)
        .bind(changes.nickname)
        .bind(changes.email)
        .bind(changes.director)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn find(&self, id: i64) -> Result<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT id, nickname, email, director FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT id, nickname, email, director FROM organizations WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Organization>, i64)> {
        let items = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, nickname, email, director
            FROM organizations
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM organizations")
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn vacancy_ids(&self, organization_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT vacancy_id FROM organization_vacancies
            WHERE organization_id = $1
            ORDER BY vacancy_id
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn attach_vacancy(&self, organization_id: i64, vacancy_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO organization_vacancies (organization_id, vacancy_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(organization_id)
        .bind(vacancy_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn detach_vacancy(&self, organization_id: i64, vacancy_id: i64) -> Result<()> {
        sqlx::query(
            "DELETE FROM organization_vacancies WHERE organization_id = $1 AND vacancy_id = $2",
        )
        .bind(organization_id)
        .bind(vacancy_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
