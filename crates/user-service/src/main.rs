use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use user_service::{app, config::Config, database::create_pool, store::PgUserStore, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let pool = create_pool(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let addr: SocketAddr = config.server_address.parse()?;
    let state = AppState::new(config, Arc::new(PgUserStore::new(pool)))?;

    if let (Some(email), Some(password)) = (
        state.config.supervisor_email.clone(),
        state.config.supervisor_password.clone(),
    ) {
        state.auth.ensure_supervisor(&email, &password).await?;
        info!("supervisor account ensured for {}", email);
    }

    let app = app(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("user-service listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
