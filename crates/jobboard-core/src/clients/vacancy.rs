use std::sync::Arc;

use serde::Deserialize;

use super::{ClientCore, RemoteResult};
use crate::breaker::CircuitBreaker;

#[derive(Debug, Clone, Deserialize)]
pub struct VacancyRef {
    pub id: i64,
    #[serde(default)]
    pub organization_id: Option<i64>,
}

#[derive(Clone)]
pub struct VacancyClient {
    core: Arc<ClientCore>,
}

impl VacancyClient {
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

    pub async fn fetch(&self, id: i64, bearer: Option<&str>) -> RemoteResult<VacancyRef> {
        self.core
            .get_json(&format!("/api/vacancies/{id}"), bearer)
            .await
    }

    /// Full vacancy document, used by hydration listings that relay the
    /// owning service's representation verbatim.
    pub async fn fetch_raw(&self, id: i64, bearer: Option<&str>) -> RemoteResult<serde_json::Value> {
        self.core
            .get_json(&format!("/api/vacancies/{id}"), bearer)
            .await
    }
}
