use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use jobboard_core::Result;

use super::{VacancyRecord, VacancyStore};
use crate::models::response::UserVacancyResponse;
use crate::models::vacancy::Vacancy;

/// In-memory store for tests and local development.
#[derive(Default)]
pub struct MemoryVacancyStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    vacancies: BTreeMap<i64, Vacancy>,
    responses: Vec<UserVacancyResponse>,
    next_vacancy_id: i64,
    next_response_id: i64,
}

impl MemoryVacancyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VacancyStore for MemoryVacancyStore {
    async fn insert(&self, record: VacancyRecord) -> Result<Vacancy> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.next_vacancy_id += 1;
        let vacancy = Vacancy {
            id: state.next_vacancy_id,
            title: record.title,
            description: record.description,
            salary: record.salary,
            city: record.city,
            organization_id: record.organization_id,
        };
        state.vacancies.insert(vacancy.id, vacancy.clone());
        Ok(vacancy)
    }

    async fn update(&self, id: i64, record: VacancyRecord) -> Result<Option<Vacancy>> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let Some(vacancy) = state.vacancies.get_mut(&id) else {
            return Ok(None);
        };
        vacancy.title = record.title;
        vacancy.description = record.description;
        vacancy.salary = record.salary;
        vacancy.city = record.city;
        vacancy.organization_id = record.organization_id;
        Ok(Some(vacancy.clone()))
    }

    async fn find(&self, id: i64) -> Result<Option<Vacancy>> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.vacancies.get(&id).cloned())
    }

    async fn list(
        &self,
        organization_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Vacancy>, i64)> {
        let state = self.state.lock().expect("store mutex poisoned");
        let matching: Vec<&Vacancy> = state
            .vacancies
            .values()
            .filter(|v| organization_id.map_or(true, |org| v.organization_id == org))
            .collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.responses.retain(|r| r.vacancy_id != id);
        Ok(state.vacancies.remove(&id).is_some())
    }

    async fn upsert_response(&self, user_id: i64, vacancy_id: i64) -> Result<UserVacancyResponse> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state
            .responses
            .retain(|r| !(r.user_id == user_id && r.vacancy_id == vacancy_id));
        state.next_response_id += 1;
        let response = UserVacancyResponse {
            id: state.next_response_id,
            user_id,
            vacancy_id,
            response_date: Utc::now(),
        };
        state.responses.push(response.clone());
        Ok(response)
    }

    async fn remove_response(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state
            .responses
            .retain(|r| !(r.user_id == user_id && r.vacancy_id == vacancy_id));
        Ok(())
    }

    async fn responses_for_user(&self, user_id: i64) -> Result<Vec<UserVacancyResponse>> {
        let state = self.state.lock().expect("store mutex poisoned");
        let mut responses: Vec<UserVacancyResponse> = state
            .responses
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        responses.sort_by_key(|r| r.vacancy_id);
        Ok(responses)
    }

    async fn responses_for_vacancy(&self, vacancy_id: i64) -> Result<Vec<UserVacancyResponse>> {
        let state = self.state.lock().expect("store mutex poisoned");
        let mut responses: Vec<UserVacancyResponse> = state
            .responses
            .iter()
            .filter(|r| r.vacancy_id == vacancy_id)
            .cloned()
            .collect();
        responses.sort_by_key(|r| r.user_id);
        Ok(responses)
    }

    async fn response_for_pair(
        &self,
        user_id: i64,
        vacancy_id: i64,
    ) -> Result<Option<UserVacancyResponse>> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .responses
            .iter()
            .find(|r| r.user_id == user_id && r.vacancy_id == vacancy_id)
            .cloned())
    }
}
