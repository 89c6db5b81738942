use async_trait::async_trait;
use jobboard_core::Result;
use sqlx::PgPool;

use super::{NewUser, UserChanges, UserStore};
use crate::models::user::User;

const USER_COLUMNS: &str = "id, nickname, email, cv_link, password_hash, roles";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn membership_ids(&self, table: &str, user_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT vacancy_id FROM {table} WHERE user_id = $1 ORDER BY vacancy_id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn membership_add(&self, table: &str, user_id: i64, vacancy_id: i64) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO {table} (user_id, vacancy_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        ))
        .bind(user_id)
        .bind(vacancy_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn membership_remove(&self, table: &str, user_id: i64, vacancy_id: i64) -> Result<()> {
        sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_id = $1 AND vacancy_id = $2"
        ))
        .bind(user_id)
        .bind(vacancy_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, new: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (nickname, email, cv_link, password_hash, roles)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.nickname)
        .bind(new.email)
        .bind(new.cv_link)
        .bind(new.password_hash)
        .bind(new.roles)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET nickname = $2, email = $3, cv_link = $4
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.nickname)
        .bind(changes.email)
        .bind(changes.cv_link)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find(&self, id: i64) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<User>, i64)> {
        let items = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ensure_role(&self, id: i64, role: &str) -> Result<()> {
        sqlx::query(
            "UPDATE users SET roles = array_append(roles, $2) WHERE id = $1 AND NOT ($2 = ANY(roles))",
        )
        .bind(id)
        .bind(role)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn favorite_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.membership_ids("user_favorites", user_id).await
    }

    async fn add_favorite(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        self.membership_add("user_favorites", user_id, vacancy_id)
            .await
    }

    async fn remove_favorite(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        self.membership_remove("user_favorites", user_id, vacancy_id)
            .await
    }

    async fn response_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.membership_ids("user_responses", user_id).await
    }

    async fn add_response(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        self.membership_add("user_responses", user_id, vacancy_id)
            .await
    }

    async fn remove_response(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        self.membership_remove("user_responses", user_id, vacancy_id)
            .await
    }
}
