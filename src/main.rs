mod api;
mod cms;
mod config;
mod error;
mod storage;
mod web_ui;

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use cms::{select_credential_source, ContentStore, CredentialConfig, CredentialSource};
use config::{AppConfig, DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Content store
    let backend = config.storage.build().await;
    match &config.storage.storage_type {
        Some(kind) => tracing::info!("Blob storage configured: {:?}", kind),
        None => tracing::warn!(
            "CMS_STORAGE not set. Serving built-in default content; edits will not be saved."
        ),
    }
    let store = ContentStore::new(backend);

    if let CredentialSource::Blob = select_credential_source(&CredentialConfig::from_env()) {
        tracing::warn!("ADMIN_EMAIL / ADMIN_PASSWORD not set; admin credentials come from blob storage.");
    }

    let mut state = AppState::new(store);
    if let Some(host) = &config.site_host {
        state = state.with_site_host(host.clone());
    }
    let state = Arc::new(state);

    let app = web_ui::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Fluentia CMS starting on http://{}", config.bind_addr);
    tracing::info!("Admin area: http://{}/admin", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
