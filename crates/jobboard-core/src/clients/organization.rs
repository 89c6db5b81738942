use std::sync::Arc;

use serde::Deserialize;

use super::{ClientCore, RemoteResult};
use crate::breaker::CircuitBreaker;

/// The slice of a remote organization the protocol needs: existence plus
/// ownership data for the director policy.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationRef {
    pub id: i64,
    #[serde(default)]
    pub director: Option<i64>,
}

#[derive(Clone)]
pub struct OrganizationClient {
    core: Arc<ClientCore>,
}

impl OrganizationClient {
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

    pub async fn fetch(&self, id: i64, bearer: Option<&str>) -> RemoteResult<OrganizationRef> {
        self.core
            .get_json(&format!("/api/organizations/{id}"), bearer)
            .await
    }
}
