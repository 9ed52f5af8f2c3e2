//! Main server implementation for the nonce API

use crate::{
    api,
    config::Config,
    credentials::{
        CredentialResolver, CredentialStore, HmacKeyHasher, InMemoryCredentialStore,
        SqliteCredentialStore,
    },
    error::{Error, Result},
    nonce::{NonceGenerator, TickNonceGenerator},
    oauth::{SignatureVerifier, SiteOrigin},
};
use axum::Router;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Main server structure
pub struct Server {
    config: Arc<Config>,
    app: Router,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Consumer key to credential lookup
    pub resolver: CredentialResolver,

    /// Signature checks
    pub verifier: Arc<SignatureVerifier>,

    /// Public origin used to rebuild signed URLs
    pub origin: Arc<SiteOrigin>,

    /// Nonce issuing
    pub nonces: Arc<dyn NonceGenerator>,
}

impl AppState {
    /// Assemble state around a credential store and nonce generator
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn CredentialStore>,
        nonces: Arc<dyn NonceGenerator>,
    ) -> Result<Self> {
        let origin = SiteOrigin::from_config(&config.oauth)?;
        let verifier = SignatureVerifier::new(origin.base_path());
        let hasher = HmacKeyHasher::new(config.oauth.key_hash_secret.clone());

        Ok(Self {
            resolver: CredentialResolver::new(store, Arc::new(hasher)),
            verifier: Arc::new(verifier),
            origin: Arc::new(origin),
            nonces,
            config,
        })
    }
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing nonce API server");

        let config = Arc::new(config);
        let store = open_store(&config).await?;
        let nonces = Arc::new(TickNonceGenerator::from_config(&config.nonce));

        let state = AppState::new(config.clone(), store, nonces)?;
        let app = Self::build_router(state);

        Ok(Self { config, app })
    }

    /// Build the application router with all routes and middleware
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .merge(api::routes(state.clone()))
            .merge(api::docs_routes())
            .with_state(state)
    }

    /// Run the server until shutdown signal
    pub async fn run(self) -> Result<()> {
        let addr = self.config.server.bind_address;

        info!("Starting HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Internal {
                message: format!("Failed to bind to address {addr}: {e}"),
            })?;

        info!("Nonce API listening on {}", addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Internal {
                message: format!("Server error: {e}"),
            })?;

        Ok(())
    }
}

async fn open_store(config: &Config) -> Result<Arc<dyn CredentialStore>> {
    if let Some(path) = &config.database.keys_file {
        info!("Serving credentials from {}", path.display());
        let store = InMemoryCredentialStore::from_json_file(path)?;
        if store.is_empty() {
            warn!("Keys file {} contains no credentials", path.display());
        }
        return Ok(Arc::new(store));
    }

    info!("Serving credentials from table {}", config.database.api_keys_table());
    Ok(Arc::new(SqliteCredentialStore::connect(&config.database).await?))
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            warn!("Received terminate signal, shutting down");
        },
    }
}
