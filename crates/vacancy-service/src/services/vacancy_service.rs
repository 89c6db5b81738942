use std::sync::Arc;

use jobboard_core::auth::{policy, Identity, ROLE_SUPERVISOR};
use jobboard_core::clients::{OrganizationClient, OrganizationRef, RemoteError};
use jobboard_core::error::{Error, Result};
use jobboard_core::pagination::PageQuery;

use crate::dto::vacancy_dto::VacancyPayload;
use crate::models::vacancy::Vacancy;
use crate::store::{VacancyRecord, VacancyStore};

pub(crate) const VACANCY_NOT_FOUND: &str = "Vacancy not found";
pub(crate) const ORGANIZATION_NOT_FOUND: &str = "Organization not found";

/// Orchestrates vacancy writes. Mutations resolve the organization through
/// the reference client first — both to confirm the foreign id and to
/// obtain the director for the ownership check — and only then touch the
/// local store, so a failed or unreachable dependency never leaves a row
/// behind.
#[derive(Clone)]
pub struct VacancyService {
    store: Arc<dyn VacancyStore>,
    organization_client: OrganizationClient,
}

impl VacancyService {
    pub fn new(store: Arc<dyn VacancyStore>, organization_client: OrganizationClient) -> Self {
        Self {
            store,
            organization_client,
        }
    }

    pub(crate) async fn resolve_organization(
        client: &OrganizationClient,
        organization_id: i64,
        bearer: Option<&str>,
    ) -> Result<OrganizationRef> {
        match client.fetch(organization_id, bearer).await {
            Ok(organization) => Ok(organization),
            Err(RemoteError::NotFound) => Err(Error::NotFound(ORGANIZATION_NOT_FOUND.to_string())),
            Err(RemoteError::Unavailable(reason)) => Err(Error::ServiceUnavailable(format!(
                "organization-service is unavailable: {reason}"
            ))),
        }
    }

    pub async fn list(
        &self,
        organization_id: Option<i64>,
        page: PageQuery,
    ) -> Result<(Vec<Vacancy>, i64)> {
        self.store
            .list(organization_id, page.limit(), page.offset())
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Vacancy> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound(VACANCY_NOT_FOUND.to_string()))
    }

    pub async fn create(
        &self,
        identity: &Identity,
        payload: VacancyPayload,
        bearer: Option<&str>,
    ) -> Result<Vacancy> {
        let organization = Self::resolve_organization(
            &self.organization_client,
            payload.organization_id,
            bearer,
        )
        .await?;
        if !identity.has_role(ROLE_SUPERVISOR) {
            policy::require_director(identity, organization.director)?;
        }

        self.store.insert(record(payload)).await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: i64,
        payload: VacancyPayload,
        bearer: Option<&str>,
    ) -> Result<Vacancy> {
        self.get(id).await?;

        // The (possibly new) organization id is re-validated on every update.
        let organization = Self::resolve_organization(
            &self.organization_client,
            payload.organization_id,
            bearer,
        )
        .await?;
        if !identity.has_role(ROLE_SUPERVISOR) {
            policy::require_director(identity, organization.director)?;
        }

        self.store
            .update(id, record(payload))
            .await?
            .ok_or_else(|| Error::NotFound(VACANCY_NOT_FOUND.to_string()))
    }

    pub async fn delete(&self, identity: &Identity, id: i64, bearer: Option<&str>) -> Result<()> {
        let vacancy = self.get(id).await?;

        // Supervisors skip the director resolution entirely, which keeps
        // vacancies of an already-deleted organization deletable.
        if !identity.has_role(ROLE_SUPERVISOR) {
            let organization = Self::resolve_organization(
                &self.organization_client,
                vacancy.organization_id,
                bearer,
            )
            .await?;
            policy::require_director(identity, organization.director)?;
        }

        self.store.delete(id).await?;
        Ok(())
    }
}

fn record(payload: VacancyPayload) -> VacancyRecord {
    VacancyRecord {
        title: payload.title,
        description: payload.description,
        salary: payload.salary,
        city: payload.city,
        organization_id: payload.organization_id,
    }
}
