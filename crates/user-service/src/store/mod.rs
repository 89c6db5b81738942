use async_trait::async_trait;
use jobboard_core::Result;

use crate::models::user::User;

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub nickname: String,
    pub email: String,
    pub cv_link: Option<String>,
    pub password_hash: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UserChanges {
    pub nickname: String,
    pub email: String,
    pub cv_link: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, new: NewUser) -> Result<User>;
    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>>;
    async fn find(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<User>, i64)>;
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn ensure_role(&self, id: i64, role: &str) -> Result<()>;

    // Favorite / response vacancy-id sets: repeat-safe membership operations.
    async fn favorite_ids(&self, user_id: i64) -> Result<Vec<i64>>;
    async fn add_favorite(&self, user_id: i64, vacancy_id: i64) -> Result<()>;
    async fn remove_favorite(&self, user_id: i64, vacancy_id: i64) -> Result<()>;

    async fn response_ids(&self, user_id: i64) -> Result<Vec<i64>>;
    async fn add_response(&self, user_id: i64, vacancy_id: i64) -> Result<()>;
    async fn remove_response(&self, user_id: i64, vacancy_id: i64) -> Result<()>;
}
