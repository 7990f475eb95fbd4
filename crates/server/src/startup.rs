use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig};
use models::{Flight, User};
use service::{FlightService, HttpUserDirectory, RecordStore, UserService};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the user store named in config and build the `/users` app.
pub async fn build_users_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store = RecordStore::<User>::open(&cfg.users.store_url).await?;
    Ok(routes::build_users_router(UserService::new(store), build_cors()))
}

/// Open the flight store and wire the HTTP user directory into `/flights`.
pub async fn build_flights_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store = RecordStore::<Flight>::open(&cfg.flights.store_url).await?;
    let users = HttpUserDirectory::new(cfg.user_service.base_url.clone(), cfg.user_service.timeout())?;
    info!(
        base_url = users.base_url(),
        timeout_ms = cfg.user_service.timeout_ms,
        "user directory configured"
    );
    let svc = FlightService::new(store, Arc::new(users));
    Ok(routes::build_flights_router(svc, build_cors()))
}

async fn serve<F>(name: &'static str, server: &ServerConfig, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server.bind_addr()).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(service = name, %addr, store_url = %server.store_url, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(service = name, "server drained");
    Ok(())
}

/// Run the user service until `shutdown` resolves.
pub async fn run_users<F>(cfg: &AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_users_app(cfg).await?;
    serve("users", &cfg.users, app, shutdown).await
}

/// Run the flight service until `shutdown` resolves.
pub async fn run_flights<F>(cfg: &AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_flights_app(cfg).await?;
    serve("flights", &cfg.flights, app, shutdown).await
}
