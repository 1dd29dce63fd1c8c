mod auth;
mod careernet;
mod config;
mod db;
mod errors;
mod explore;
mod profile;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{FirebaseIdentity, IdentityProvider};
use crate::careernet::chain::FallbackChain;
use crate::careernet::endpoints::EndpointCatalog;
use crate::careernet::fetch::ReqwestFetcher;
use crate::careernet::retry::RetryPolicy;
use crate::careernet::CareerNetClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::profile::repository::UserRepository;
use crate::profile::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));
    for warning in config.warnings() {
        warn!("{warning}");
    }

    // Profile storage: Postgres when configured, otherwise in memory
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(PgDocumentStore::new(create_pool(url).await?)),
        None => Arc::new(MemoryDocumentStore::default()),
    };
    let repo = UserRepository::new(store);

    // Upstream career data client
    let mut catalog = EndpointCatalog::default_for(
        &config.careernet_base_url,
        &config.careernet_base_url_v2,
    );
    if let Some(path) = &config.careernet_endpoints_file {
        catalog = catalog.with_overrides_from_file(path)?;
        info!("Endpoint catalogue overrides loaded from {}", path.display());
    }
    let fetcher = ReqwestFetcher::new().context("building HTTP client")?;
    let chain = FallbackChain::new(
        Arc::new(fetcher),
        RetryPolicy::new(config.careernet_max_attempts, config.careernet_retry_delay),
        config.careernet_api_key().to_string(),
        config.careernet_timeout,
    );
    let careernet = Arc::new(CareerNetClient::new(chain, catalog));
    info!(
        "CareerNet client initialized ({} attempts, {:?} between)",
        config.careernet_max_attempts, config.careernet_retry_delay
    );

    let identity: Arc<dyn IdentityProvider> = Arc::new(FirebaseIdentity::new(
        config.identity_base_url.clone(),
        config.identity_api_key.clone(),
    ));

    let state = AppState {
        repo,
        careernet,
        identity,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
