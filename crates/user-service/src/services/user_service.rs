use std::sync::Arc;

use jobboard_core::auth::{policy, Identity, ROLE_SUPERVISOR, ROLE_USER};
use jobboard_core::clients::{RemoteError, VacancyClient};
use jobboard_core::error::{Error, Result};
use jobboard_core::pagination::PageQuery;

use crate::dto::user_dto::{CreateUserPayload, UpdateUserPayload};
use crate::models::user::User;
use crate::store::{NewUser, UserChanges, UserStore};
use crate::utils::crypto;

const USER_NOT_FOUND: &str = "User not found";
const EMAIL_TAKEN: &str = "A user with this email is already registered";

/// Which of the two vacancy-id sets an operation touches. Both obey the
/// same discipline: remote-validate on add, local-only remove, repeat-safe
/// either way.
#[derive(Debug, Clone, Copy)]
pub enum Relation {
    Favorites,
    Responses,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    vacancy_client: VacancyClient,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, vacancy_client: VacancyClient) -> Self {
        Self {
            store,
            vacancy_client,
        }
    }

    pub async fn list(&self, page: PageQuery) -> Result<(Vec<User>, i64)> {
        self.store.list(page.limit(), page.offset()).await
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound(USER_NOT_FOUND.to_string()))
    }

    pub async fn create(&self, identity: &Identity, payload: CreateUserPayload) -> Result<User> {
        policy::require_role(identity, ROLE_SUPERVISOR)?;

        if self.store.find_by_email(&payload.email).await?.is_some() {
            return Err(Error::Conflict(EMAIL_TAKEN.to_string()));
        }

        let password_hash = crypto::hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("failed to hash password: {e}")))?;

        self.store
            .insert(NewUser {
                nickname: payload.nickname,
                email: payload.email,
                cv_link: payload.cv_link,
                password_hash,
                roles: vec![ROLE_USER.to_string()],
            })
            .await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: i64,
        payload: UpdateUserPayload,
    ) -> Result<User> {
        policy::require_self(identity, id)?;
        let existing = self.get(id).await?;

        if payload.email != existing.email {
            if let Some(other) = self.store.find_by_email(&payload.email).await? {
                if other.id != id {
                    return Err(Error::Conflict(EMAIL_TAKEN.to_string()));
                }
            }
        }

        self.store
            .update(
                id,
                UserChanges {
                    nickname: payload.nickname,
                    email: payload.email,
                    cv_link: payload.cv_link,
                },
            )
            .await?
            .ok_or_else(|| Error::NotFound(USER_NOT_FOUND.to_string()))
    }

    pub async fn delete(&self, identity: &Identity, id: i64) -> Result<()> {
        policy::require_self_or_role(identity, id, ROLE_SUPERVISOR)?;
        if !self.store.delete(id).await? {
            return Err(Error::NotFound(USER_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub async fn relation_ids(
        &self,
        identity: &Identity,
        user_id: i64,
        relation: Relation,
    ) -> Result<Vec<i64>> {
        policy::require_self_or_role(identity, user_id, ROLE_SUPERVISOR)?;
        self.get(user_id).await?;
        match relation {
            Relation::Favorites => self.store.favorite_ids(user_id).await,
            Relation::Responses => self.store.response_ids(user_id).await,
        }
    }

    /// Hydrates the stored vacancy ids against the vacancy service. Ids
    /// that no longer resolve are skipped; an unreachable vacancy service
    /// degrades the listing to an empty list rather than an error.
    pub async fn relation_vacancies(
        &self,
        identity: &Identity,
        user_id: i64,
        relation: Relation,
        bearer: Option<&str>,
    ) -> Result<Vec<serde_json::Value>> {
        let ids = self.relation_ids(identity, user_id, relation).await?;

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

    pub async fn add_relation(
        &self,
        identity: &Identity,
        user_id: i64,
        vacancy_id: i64,
        relation: Relation,
        bearer: Option<&str>,
    ) -> Result<()> {
        policy::require_self(identity, user_id)?;
        self.get(user_id).await?;

        // The foreign id must resolve before anything is written locally.
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

        match relation {
            Relation::Favorites => self.store.add_favorite(user_id, vacancy_id).await,
            Relation::Responses => self.store.add_response(user_id, vacancy_id).await,
        }
    }

    pub async fn remove_relation(
        &self,
        identity: &Identity,
        user_id: i64,
        vacancy_id: i64,
        relation: Relation,
    ) -> Result<()> {
        policy::require_self(identity, user_id)?;
        self.get(user_id).await?;
        // Local-only: a dangling id must stay removable when the vacancy
        // service is down.
        match relation {
            Relation::Favorites => self.store.remove_favorite(user_id, vacancy_id).await,
            Relation::Responses => self.store.remove_response(user_id, vacancy_id).await,
        }
    }
}
