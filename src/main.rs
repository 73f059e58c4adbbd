mod config;
mod handlers;
mod inventory;
mod models;
mod resolver;
mod rest;
mod router;
mod status;
mod utils;

use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use inventory::Store;
use models::SwitchRecord;
use resolver::ConnectionResolver;
use rest::{RestSwitchClient, SwitchApi};
use status::StatusPoller;

/// Application state shared across handlers
pub struct AppState {
    pub store: Store,
    pub client: Arc<dyn SwitchApi>,
    pub resolver: Arc<ConnectionResolver>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchdash=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::load();
    tracing::info!("Starting switchdash server");
    tracing::info!("Switch API version: v{}", cfg.api_version);
    tracing::info!("Listen: {}", cfg.listen_addr);
    if !cfg.ssl_verify {
        tracing::warn!("SSL_VERIFY is off - switch certificates are not validated");
    }

    // Initialize inventory and seed configured switches
    let store = Store::new();
    for address in &cfg.default_switches {
        if store.add_switch(SwitchRecord::new(address.clone(), None)).await {
            tracing::info!("Seeded default switch: {}", address);
        }
    }

    // Switch REST client and credential resolver
    let client: Arc<dyn SwitchApi> = Arc::new(RestSwitchClient::new(
        cfg.api_version.clone(),
        cfg.ssl_verify,
        cfg.request_timeout,
    ));
    let resolver = Arc::new(ConnectionResolver::new(
        store.clone(),
        Arc::clone(&client),
        cfg.default_credentials(),
    ));

    // Start background status poller
    let mut poller = StatusPoller::new(store.clone(), Arc::clone(&resolver), cfg.poll_interval);
    poller.start();

    // Create app state
    let state = Arc::new(AppState {
        store,
        client,
        resolver,
    });

    // Build router
    let app = router::build(state, &cfg.frontend_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("switchdash listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("switchdash shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Build an AppState around a scripted switch client, for handler tests.
#[cfg(test)]
pub fn test_state(client: Arc<dyn SwitchApi>) -> Arc<AppState> {
    let store = Store::new();
    let resolver = Arc::new(ConnectionResolver::new(
        store.clone(),
        Arc::clone(&client),
        vec![
            ("admin".to_string(), "admin".to_string()),
            ("admin".to_string(), String::new()),
        ],
    ));
    Arc::new(AppState {
        store,
        client,
        resolver,
    })
}
