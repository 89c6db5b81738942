use std::sync::Arc;

use serde::Deserialize;

use super::{ClientCore, RemoteResult};
use crate::breaker::CircuitBreaker;

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub id: i64,
}

#[derive(Clone)]
pub struct UserClient {
    core: Arc<ClientCore>,
}

impl UserClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        breaker: CircuitBreaker,
    ) -> Self {
        Self {
            core: ClientCore::new(http, base_url, breaker),
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.core.breaker
    }

    pub async fn fetch(&self, id: i64, bearer: Option<&str>) -> RemoteResult<UserRef> {
        self.core.get_json(&format!("/api/users/{id}"), bearer).await
    }
}
