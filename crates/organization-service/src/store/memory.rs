use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use jobboard_core::Result;

use super::{NewOrganization, OrganizationChanges, OrganizationStore};
use crate::models::organization::Organization;

/// In-memory store for tests and local development.
#[derive(Default)]
pub struct MemoryOrganizationStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    organizations: BTreeMap<i64, Organization>,
    vacancies: BTreeMap<i64, BTreeSet<i64>>,
    next_id: i64,
}

impl MemoryOrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationStore for MemoryOrganizationStore {
    async fn insert(&self, new: NewOrganization) -> Result<Organization> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.next_id += 1;
        let organization = Organization {
            id: state.next_id,
            nickname: new.nickname,
            email: new.email,
            director: new.director,
        };
        state
            .organizations
            .insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn update(&self, id: i64, changes: OrganizationChanges) -> Result<Option<Organization>> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let Some(organization) = state.organizations.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(nickname) = changes.nickname {
            organization.nickname = nickname;
        }
        if let Some(email) = changes.email {
            organization.email = email;
        }
        if let Some(director) = changes.director {
            organization.director = director;
        }
        Ok(Some(organization.clone()))
    }

    async fn find(&self, id: i64) -> Result<Option<Organization>> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.organizations.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Organization>> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .organizations
            .values()
            .find(|o| o.email == email)
            .cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Organization>, i64)> {
        let state = self.state.lock().expect("store mutex poisoned");
        let total = state.organizations.len() as i64;
        let items = state
            .organizations
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.vacancies.remove(&id);
        Ok(state.organizations.remove(&id).is_some())
    }

    async fn vacancy_ids(&self, organization_id: i64) -> Result<Vec<i64>> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .vacancies
            .get(&organization_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn attach_vacancy(&self, organization_id: i64, vacancy_id: i64) -> Result<()> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state
            .vacancies
            .entry(organization_id)
            .or_default()
            .insert(vacancy_id);
        Ok(())
    }

    async fn detach_vacancy(&self, organization_id: i64, vacancy_id: i64) -> Result<()> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if let Some(ids) = state.vacancies.get_mut(&organization_id) {
            ids.remove(&vacancy_id);
        }
        Ok(())
    }
}
