use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use jobboard_core::Result;

use super::{NewUser, UserChanges, UserStore};
use crate::models::user::User;

/// In-memory store for tests and local development.
#[derive(Default)]
pub struct MemoryUserStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    users: BTreeMap<i64, User>,
    favorites: BTreeMap<i64, BTreeSet<i64>>,
    responses: BTreeMap<i64, BTreeSet<i64>>,
    next_id: i64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, new: NewUser) -> Result<User> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.next_id += 1;
        let user = User {
            id: state.next_id,
            nickname: new.nickname,
            email: new.email,
            cv_link: new.cv_link,
            password_hash: new.password_hash,
            roles: new.roles,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        user.nickname = changes.nickname;
        user.email = changes.email;
        user.cv_link = changes.cv_link;
        Ok(Some(user.clone()))
    }

    async fn find(&self, id: i64) -> Result<Option<User>> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<User>, i64)> {
        let state = self.state.lock().expect("store mutex poisoned");
        let total = state.users.len() as i64;
        let items = state
            .users
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.favorites.remove(&id);
        state.responses.remove(&id);
        Ok(state.users.remove(&id).is_some())
    }

    async fn ensure_role(&self, id: i64, role: &str) -> Result<()> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if let Some(user) = state.users.get_mut(&id) {
            if !user.roles.iter().any(|r| r == role) {
                user.roles.push(role.to_string());
            }
        }
        Ok(())
    }

    async fn favorite_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .favorites
            .get(&user_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn add_favorite(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.favorites.entry(user_id).or_default().insert(vacancy_id);
        Ok(())
    }

    async fn remove_favorite(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if let Some(ids) = state.favorites.get_mut(&user_id) {
            ids.remove(&vacancy_id);
        }
        Ok(())
    }

    async fn response_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .responses
            .get(&user_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn add_response(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.responses.entry(user_id).or_default().insert(vacancy_id);
        Ok(())
    }

    async fn remove_response(&self, user_id: i64, vacancy_id: i64) -> Result<()> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if let Some(ids) = state.responses.get_mut(&user_id) {
            ids.remove(&vacancy_id);
        }
        Ok(())
    }
}
