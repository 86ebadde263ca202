use std::{net::SocketAddr, sync::Arc};

use config::{Config, APP_NAME};
use events::EventChannel;
use service::{auth::MockAuthenticator, presence::PresenceService};
use tokio::{net::TcpListener, sync::Mutex};

mod config;
mod events;
mod model;
mod repo;
mod routes;
mod service;
mod utils;

#[derive(Clone)]
struct AppState {
    presence: Arc<Mutex<PresenceService>>,
}

impl AppState {
    fn new(config: &Config) -> Self {
        let event_channel = EventChannel::with_capacity(config.roster_channel_capacity);
        Self {
            presence: Arc::new(Mutex::new(PresenceService::new(
                Arc::new(MockAuthenticator),
                event_channel,
            ))),
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env();
    let state = AppState::new(&config);

    let app = routes::create_app(state, &config.public_path);

    let listener = TcpListener::bind((config.listen_address.as_str(), config.port)).await?;
    tracing::info!("{APP_NAME} listening on {}", listener.local_addr()?);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("Shutting down");
}
