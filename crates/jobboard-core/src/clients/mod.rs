//! Typed reference clients for entities owned by sibling services.
//!
//! Every lookup goes through the dependency's circuit breaker and forwards
//! the original caller's bearer token, so the downstream service applies its
//! own authentication and authorization to the real caller. A lookup can
//! fail in exactly two ways the orchestrators care about: the entity does
//! not exist, or the dependency cannot be asked right now.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::breaker::CircuitBreaker;

mod organization;
mod user;
mod vacancy;

pub use organization::{OrganizationClient, OrganizationRef};
pub use user::{UserClient, UserRef};
pub use vacancy::{VacancyClient, VacancyRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The dependency answered and the entity does not exist.
    NotFound,
    /// Breaker open, transport failure, timeout, or an unusable response.
    Unavailable(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "remote entity not found"),
            Self::Unavailable(reason) => write!(f, "dependency unavailable: {reason}"),
        }
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

struct ClientCore {
    http: reqwest::Client,
    base_url: String,
    breaker: CircuitBreaker,
}

impl ClientCore {
    fn new(http: reqwest::Client, base_url: impl Into<String>, breaker: CircuitBreaker) -> Arc<Self> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Arc::new(Self {
            http,
            base_url,
            breaker,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> RemoteResult<T> {
        if let Err(open) = self.breaker.check() {
            return Err(RemoteError::Unavailable(open.to_string()));
        }

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                self.breaker.record_failure();
                tracing::warn!(dependency = %self.breaker.name(), error = %err, "remote call failed");
                return Err(RemoteError::Unavailable(err.to_string()));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            // The dependency is healthy, the entity is simply gone.
            self.breaker.record_success();
            return Err(RemoteError::NotFound);
        }
        if status.is_client_error() {
            self.breaker.record_success();
            return Err(RemoteError::Unavailable(format!(
                "unexpected status {status}"
            )));
        }
        if !status.is_success() {
            self.breaker.record_failure();
            return Err(RemoteError::Unavailable(format!("status {status}")));
        }

        match response.json::<T>().await {
            Ok(value) => {
                self.breaker.record_success();
                Ok(value)
            }
            Err(err) => {
                self.breaker.record_failure();
                Err(RemoteError::Unavailable(format!(
                    "undecodable response: {err}"
                )))
            }
        }
    }
}
