use common::http_client::HttpClient;
use common::tracing::init_from_format;
use gateway::auth::firebase::FirebaseIdentityClient;
use gateway::auth::service_account::{ServiceAccount, TokenSource};
use gateway::config::Config;
use gateway::location::api_client::GeoapifyClient;
use gateway::routes::{self, AppState};
use gateway::weather::api_client::OpenWeatherClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_from_format(&std::env::var("LOG_FORMAT").unwrap_or_default());

    let config = Config::from_env()?;
    let http_client = HttpClient::new(config.upstream_timeout_secs)?;

    let service_account = ServiceAccount::from_file(&config.service_account_path)?;
    info!(project_id = %service_account.project_id, "Loaded service account");
    let tokens = TokenSource::new(service_account, http_client.clone())?;

    let state = AppState {
        identity: Arc::new(FirebaseIdentityClient::new(
            http_client.clone(),
            tokens,
            config.identity_base_url.clone(),
            config.firebase_api_key.clone(),
        )),
        weather: Arc::new(OpenWeatherClient::new(
            http_client.clone(),
            config.weather_base_url.clone(),
            config.weather_api_key.clone(),
        )),
        location: Arc::new(GeoapifyClient::new(
            http_client,
            config.location_base_url.clone(),
            config.location_api_key.clone(),
        )),
    };

    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }

    // In-flight upstream calls finish; dropped connections cancel theirs.
    warn!("Shutting down gracefully...");
}
