use std::sync::Arc;

use bugboard::config::AppConfig;
use bugboard::routes;
use bugboard::state::AppState;
use bugboard::tracker::BugzillaClient;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let tracker = match BugzillaClient::new(&config.tracker) {
        Ok(client) => {
            tracing::info!(tracker = client.base_url(), "bugzilla client initialized");
            client
        }
        Err(e) => {
            tracing::error!(error = %e, "bugzilla client init failed");
            std::process::exit(1);
        }
    };

    let port = config.port;
    tracing::info!(public_url = %config.public_url, render_mode = ?config.render_mode, "config loaded");
    let state = AppState::new(config, Arc::new(tracker));

    let app = routes::app(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %port, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%port, "bugboard listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
