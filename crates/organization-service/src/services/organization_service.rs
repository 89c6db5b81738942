use std::sync::Arc;

use jobboard_core::auth::{policy, Identity, ROLE_SUPERVISOR};
use jobboard_core::clients::{RemoteError, VacancyClient};
use jobboard_core::error::{Error, Result};
use jobboard_core::pagination::PageQuery;

use crate::dto::organization_dto::{CreateOrganizationPayload, UpdateOrganizationPayload};
use crate::models::organization::Organization;
use crate::store::{NewOrganization, OrganizationChanges, OrganizationStore};

const ORGANIZATION_NOT_FOUND: &str = "Organization not found";

/// Orchestrates organization writes and the organization → vacancy
/// relation. Every mutation validates identity and ownership first, then
/// any remote references, and only then touches the local store.
#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn OrganizationStore>,
    vacancy_client: VacancyClient,
}

impl OrganizationService {
    pub fn new(store: Arc<dyn OrganizationStore>, vacancy_client: VacancyClient) -> Self {
        Self {
            store,
            vacancy_client,
        }
    }

    pub async fn list(&self, page: PageQuery) -> Result<(Vec<Organization>, i64)> {
        self.store.list(page.limit(), page.offset()).await
    }

    pub async fn get(&self, id: i64) -> Result<Organization> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound(ORGANIZATION_NOT_FOUND.to_string()))
    }

    pub async fn create(
        &self,
        identity: &Identity,
        payload: CreateOrganizationPayload,
    ) -> Result<Organization> {
        let director = payload.director.unwrap_or(identity.subject_id);
        if director != identity.subject_id {
            policy::require_role(identity, ROLE_SUPERVISOR)?;
        }

        if self.store.find_by_email(&payload.email).await?.is_some() {
            return Err(Error::Conflict(
                "An organization with this email is already registered".to_string(),
            ));
        }

        self.store
            .insert(NewOrganization {
                nickname: payload.nickname,
                email: payload.email,
                director,
            })
            .await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: i64,
        payload: UpdateOrganizationPayload,
    ) -> Result<Organization> {
        let existing = self.get(id).await?;
        if !identity.has_role(ROLE_SUPERVISOR) {
            policy::require_director(identity, Some(existing.director))?;
        }

        // Reassigning the directorship is role-gated regardless of ownership.
        if let Some(director) = payload.director {
            if director != existing.director {
                policy::require_role(identity, ROLE_SUPERVISOR)?;
            }
        }

        if let Some(email) = &payload.email {
            if let Some(other) = self.store.find_by_email(email).await? {
                if other.id != id {
                    return Err(Error::Conflict(
                        "An organization with this email is already registered".to_string(),
                    ));
                }
            }
        }

        self.store
            .update(
                id,
                OrganizationChanges {
                    nickname: payload.nickname,
                    email: payload.email,
                    director: payload.director,
                },
            )
            .await?
            .ok_or_else(|| Error::NotFound(ORGANIZATION_NOT_FOUND.to_string()))
    }

    pub async fn delete(&self, identity: &Identity, id: i64) -> Result<()> {
        let existing = self.get(id).await?;
        if !identity.has_role(ROLE_SUPERVISOR) {
            policy::require_director(identity, Some(existing.director))?;
        }
        self.store.delete(id).await?;
        Ok(())
    }

    /// Hydrates the organization's vacancy ids against the vacancy service.
    /// Ids that no longer resolve are skipped; an unreachable vacancy
    /// service degrades the listing to an empty list rather than an error.
    pub async fn vacancies(&self, id: i64, bearer: Option<&str>) -> Result<Vec<serde_json::Value>> {
        self.get(id).await?;
        let ids = self.store.vacancy_ids(id).await?;

        let mut vacancies = Vec::with_capacity(ids.len());
        for vacancy_id in ids {
            match self.vacancy_client.fetch_raw(vacancy_id, bearer).await {
                Ok(vacancy) => vacancies.push(vacancy),
                Err(RemoteError::NotFound) => continue,
                Err(RemoteError::Unavailable(reason)) => {
                    tracing::warn!(%reason, "vacancy hydration degraded to empty list");
                    return Ok(Vec::new());
                }
            }
        }
        Ok(vacancies)
    }

    pub async fn attach_vacancy(
        &self,
        identity: &Identity,
        organization_id: i64,
        vacancy_id: i64,
        bearer: Option<&str>,
    ) -> Result<()> {
        let organization = self.get(organization_id).await?;
        if !identity.has_role(ROLE_SUPERVISOR) {
            policy::require_director(identity, Some(organization.director))?;
        }

        match self.vacancy_client.fetch(vacancy_id, bearer).await {
            Ok(_) => {}
            Err(RemoteError::NotFound) => {
                return Err(Error::NotFound("Vacancy not found".to_string()));
            }
            Err(RemoteError::Unavailable(reason)) => {
                return Err(Error::ServiceUnavailable(format!(
                    "vacancy-service is unavailable: {reason}"
                )));
            }
        }

        self.store.attach_vacancy(organization_id, vacancy_id).await
    }

    pub async fn detach_vacancy(
        &self,
        identity: &Identity,
        organization_id: i64,
        vacancy_id: i64,
    ) -> Result<()> {
        let organization = self.get(organization_id).await?;
        if !identity.has_role(ROLE_SUPERVISOR) {
            policy::require_director(identity, Some(organization.director))?;
        }
        // Removal is purely local; a dangling id must stay removable even
        // when the vacancy service is down.
        self.store.detach_vacancy(organization_id, vacancy_id).await
    }
}
