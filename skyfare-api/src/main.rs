use std::net::SocketAddr;

use skyfare_api::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyfare_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = skyfare_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting SkyFare API on port {}", config.server.port);

    let state = AppState::build(config.business_rules.clone());

    if config.seed.enabled {
        skyfare_store::seed_demo_data(&state.store, config.business_rules.opening_balance)
            .await
            .expect("Failed to seed demo data");
    }

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
