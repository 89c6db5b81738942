pub mod config;
pub mod database;
pub mod dto;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use jobboard_core::auth::{self, JwtKeys};
use jobboard_core::breaker::CircuitBreaker;
use jobboard_core::clients::VacancyClient;
use jobboard_core::error::{Error, Result};

use crate::config::Config;
use crate::services::{auth_service::AuthService, user_service::UserService};
use crate::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: UserService,
    pub auth: AuthService,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn UserStore>) -> Result<Self> {
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
        let users = UserService::new(store.clone(), vacancy_client);
        let auth = AuthService::new(store, jwt.clone(), config.token_ttl);

        Ok(Self {
            config: Arc::new(config),
            users,
            auth,
            jwt,
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/auth/login", post(routes::auth::login))
        .route(
            "/api/users",
            get(routes::user::list_users).post(routes::user::create_user),
        )
        .route(
            "/api/users/:id",
            get(routes::user::get_user)
                .put(routes::user::update_user)
                .delete(routes::user::delete_user),
        )
        .route("/api/users/:id/favorites", get(routes::user::get_favorites))
        .route(
            "/api/users/:id/favorites/ids",
            get(routes::user::get_favorite_ids),
        )
        .route(
            "/api/users/:id/favorite/:vacancy_id",
            put(routes::user::add_favorite).delete(routes::user::remove_favorite),
        )
        .route("/api/users/:id/responses", get(routes::user::get_responses))
        .route(
            "/api/users/:id/responses/ids",
            get(routes::user::get_response_ids),
        )
        .route(
            "/api/users/:id/respond/:vacancy_id",
            put(routes::user::add_response).delete(routes::user::remove_response),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.jwt.clone(),
            auth::authenticate,
        ))
        .with_state(state)
}
