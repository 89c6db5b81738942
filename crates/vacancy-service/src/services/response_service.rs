use std::sync::Arc;

use jobboard_core::auth::{policy, Identity, ROLE_SUPERVISOR};
use jobboard_core::clients::{OrganizationClient, RemoteError, UserClient};
use jobboard_core::error::{Error, Result};

use super::vacancy_service::{VacancyService, VACANCY_NOT_FOUND};
use crate::dto::vacancy_dto::ResponseQuery;
use crate::models::response::UserVacancyResponse;
use crate::store::VacancyStore;

/// Orchestrates the user → vacancy response relation this service owns.
/// The responding user lives in the user service, so responding validates
/// the user remotely before the local replace-with-fresh-timestamp write.
#[derive(Clone)]
pub struct ResponseService {
    store: Arc<dyn VacancyStore>,
    user_client: UserClient,
    organization_client: OrganizationClient,
}

impl ResponseService {
    pub fn new(
        store: Arc<dyn VacancyStore>,
        user_client: UserClient,
        organization_client: OrganizationClient,
    ) -> Self {
        Self {
            store,
            user_client,
            organization_client,
        }
    }

    pub async fn respond(
        &self,
        identity: &Identity,
        vacancy_id: i64,
        user_id: i64,
        bearer: Option<&str>,
    ) -> Result<()> {
        // Responding on behalf of another user is forbidden outright.
        policy::require_self(identity, user_id)?;

        match self.user_client.fetch(user_id, bearer).await {
            Ok(_) => {}
            Err(RemoteError::NotFound) => {
                return Err(Error::NotFound("User not found".to_string()));
            }
            Err(RemoteError::Unavailable(reason)) => {
                return Err(Error::ServiceUnavailable(format!(
                    "user-service is unavailable: {reason}"
                )));
            }
        }

        if self.store.find(vacancy_id).await?.is_none() {
            return Err(Error::NotFound(VACANCY_NOT_FOUND.to_string()));
        }

        self.store.upsert_response(user_id, vacancy_id).await?;
        Ok(())
    }

    pub async fn remove(&self, identity: &Identity, vacancy_id: i64, user_id: i64) -> Result<()> {
        policy::require_self(identity, user_id)?;
        // Idempotent and purely local; removing a response must keep
        // working when the user service is down.
        self.store.remove_response(user_id, vacancy_id).await
    }

    /// Listing by pair or by user is self-gated; listing a vacancy's
    /// responses is for the director of the owning organization, which
    /// takes a remote resolution to establish.
    pub async fn query(
        &self,
        identity: &Identity,
        query: ResponseQuery,
        bearer: Option<&str>,
    ) -> Result<Vec<UserVacancyResponse>> {
        match (query.user_id, query.vacancy_id) {
            (Some(user_id), Some(vacancy_id)) => {
                policy::require_self_or_role(identity, user_id, ROLE_SUPERVISOR)?;
                Ok(self
                    .store
                    .response_for_pair(user_id, vacancy_id)
                    .await?
                    .into_iter()
                    .collect())
            }
            (Some(user_id), None) => {
                policy::require_self_or_role(identity, user_id, ROLE_SUPERVISOR)?;
                self.store.responses_for_user(user_id).await
            }
            (None, Some(vacancy_id)) => {
                let vacancy = self
                    .store
                    .find(vacancy_id)
                    .await?
                    .ok_or_else(|| Error::NotFound(VACANCY_NOT_FOUND.to_string()))?;
                if !identity.has_role(ROLE_SUPERVISOR) {
                    let organization = VacancyService::resolve_organization(
                        &self.organization_client,
                        vacancy.organization_id,
                        bearer,
                    )
                    .await?;
                    policy::require_director(identity, organization.director)?;
                }
                self.store.responses_for_vacancy(vacancy_id).await
            }
            (None, None) => Err(Error::BadRequest(
                "At least one of vacancyId and userId is required".to_string(),
            )),
        }
    }
}
