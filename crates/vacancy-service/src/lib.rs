pub mod config;
pub mod database;
pub mod dto;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{routing::get, Router};
use jobboard_core::auth::{self, JwtKeys};
use jobboard_core::breaker::CircuitBreaker;
use jobboard_core::clients::{OrganizationClient, UserClient};
use jobboard_core::error::{Error, Result};

use crate::config::Config;
use crate::services::{response_service::ResponseService, vacancy_service::VacancyService};
use crate::store::VacancyStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub vacancies: VacancyService,
    pub responses: ResponseService,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn VacancyStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.remote_timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build http client: {e}")))?;

        // One breaker per logical dependency, shared by every request.
        let organization_client = OrganizationClient::new(
            http.clone(),
            config.organization_service_url.clone(),
            CircuitBreaker::new("organization-service", config.breaker.clone()),
        );
        let user_client = UserClient::new(
            http,
            config.user_service_url.clone(),
            CircuitBreaker::new("user-service", config.breaker.clone()),
        );
        let jwt = JwtKeys::from_secret(&config.jwt_secret);

        let vacancies = VacancyService::new(store.clone(), organization_client.clone());
        let responses = ResponseService::new(store, user_client, organization_client);

        Ok(Self {
            config: Arc::new(config),
            vacancies,
            responses,
            jwt,
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/vacancies",
            get(routes::vacancy::list_vacancies).post(routes::vacancy::create_vacancy),
        )
        .route(
            "/api/vacancies/responses",
            get(routes::response::list_responses)
                .put(routes::response::respond_to_vacancy)
                .delete(routes::response::remove_response),
        )
        .route(
            "/api/vacancies/:id",
            get(routes::vacancy::get_vacancy)
                .put(routes::vacancy::update_vacancy)
                .delete(routes::vacancy::delete_vacancy),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.jwt.clone(),
            auth::authenticate,
        ))
        .with_state(state)
}
