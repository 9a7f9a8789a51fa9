use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use segment_server::config::ServerConfig;
use segment_server::domain::ReferenceData;
use segment_server::geo::GeometryClient;
use segment_server::registrar::SegmentRegistrar;
use segment_server::store::{JsonFileStore, SegmentStore};
use segment_server::web::{AppState, create_router};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "segment_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    // Reference lists: file override or the built-in seed
    let reference = match &config.reference_file {
        Some(path) => ReferenceData::load(path).expect("Failed to load reference data"),
        None => ReferenceData::seeded(),
    };
    info!(
        states = reference.states().len(),
        routes = reference.routes().len(),
        "reference data loaded"
    );

    let store = JsonFileStore::open(&config.data_file).expect("Failed to open segment store");
    info!(
        path = %config.data_file.display(),
        segments = store.len().unwrap_or_default(),
        "segment store opened"
    );

    let client =
        GeometryClient::new(config.upstream.clone()).expect("Failed to create geometry client");
    info!(endpoints = ?client.endpoints(), "geometry client ready");

    let registrar = SegmentRegistrar::new(Arc::new(client), Arc::new(store), Arc::new(reference));
    let state = AppState::new(registrar);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    info!(addr = %config.bind_addr, "segment registry listening");
    info!("Open http://{}/segments in your browser", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
