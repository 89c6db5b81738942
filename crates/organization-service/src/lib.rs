pub mod config;
pub mod database;
pub mod dto;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};
use jobboard_core::auth::{self, JwtKeys};
use jobboard_core::breaker::CircuitBreaker;
use jobboard_core::clients::VacancyClient;
use jobboard_core::error::{Error, Result};

use crate::config::Config;
use crate::services::organization_service::OrganizationService;
use crate::store::OrganizationStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub organizations: OrganizationService,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn OrganizationStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.remote_timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;

        let vacancy_client = VacancyClient::new(
            http,
            config.vacancy_service_url.clone(),
            CircuitBreaker::new("vacancy-service", config.breaker.clone()),
        );
        let jwt = JwtKeys::from_secret(&config.jwt_secret);

        Ok(Self {
            config: Arc::new(config),
            organizations: OrganizationService::new(store, vacancy_client),
            jwt,
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/organizations",
            get(routes::organization::list_organizations)
                .post(routes::organization::create_organization),
        )
        .route(
            "/api/organizations/:id",
            get(routes::organization::get_organization)
                .put(routes::organization::update_organization)
                .delete(routes::organization::delete_organization),
        )
        .route(
            "/api/organizations/:id/vacancies",
            get(routes::organization::list_organization_vacancies),
        )
        .route(
            "/api/organizations/:id/vacancies/:vacancy_id",
            put(routes::organization::attach_vacancy)
                .delete(routes::organization::detach_vacancy),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.jwt.clone(),
            auth::authenticate,
        ))
        .with_state(state)
}
