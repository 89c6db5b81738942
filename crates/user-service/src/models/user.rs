use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub cv_link: Option<String>,
    pub password_hash: String,
    pub roles: Vec<String>,
}
