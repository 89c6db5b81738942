use async_trait::async_trait;
use jobboard_core::Result;

use crate::models::organization::Organization;

mod memory;
mod postgres;

pub use memory::MemoryOrganizationStore;
pub use postgres::PgOrganizationStore;

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub nickname: String,
    pub email: String,
    pub director: i64,
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationChanges {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub director: Option<i64>,
}

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn insert(&self, new: NewOrganization) -> Result<Organization>;
    async fn update(&self, id: i64, changes: OrganizationChanges) -> Result<Option<Organization>>;
    async fn find(&self, id: i64) -> Result<Option<Organization>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Organization>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Organization>, i64)>;
    async fn delete(&self, id: i64) -> Result<bool>;

    // Organization → vacancy relation: repeat-safe membership operations.
    async fn vacancy_ids(&self, organization_id: i64) -> Result<Vec<i64>>;
    async fn attach_vacancy(&self, organization_id: i64, vacancy_id: i64) -> Result<()>;
    async fn detach_vacancy(&self, organization_id: i64, vacancy_id: i64) -> Result<()>;
}
