//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{PasswordService, Repositories, TokenService};
use scribe_core::services::BlogServices;
use scribe_infra::database::DatabaseConfig;
use scribe_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use scribe_infra::DatabaseConnections;

use crate::config::{AppConfig, SessionConfig};

/// Where the blog's rows live.
#[derive(Clone)]
pub enum Storage {
    Memory,
    #[cfg(feature = "postgres")]
    Postgres(DatabaseConnections),
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            Storage::Memory => "memory",
            #[cfg(feature = "postgres")]
            Storage::Postgres(_) => "postgres",
        }
    }

    /// Whether the backing store answers.
    pub async fn is_reachable(&self) -> bool {
        match self {
            Storage::Memory => true,
            #[cfg(feature = "postgres")]
            Storage::Postgres(db) => db.ping().await.is_ok(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: BlogServices,
    pub tokens: Arc<dyn TokenService>,
    pub session: SessionConfig,
    pub storage: Storage,
}

impl AppState {
    /// Build the state from configuration, falling back to the in-memory store
    /// when no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let (repos, storage) = open_storage(config.database.as_ref()).await;

        tracing::info!(storage = storage.name(), "Application state initialized");

        Self::from_parts(repos, passwords, tokens, config.session.clone(), storage)
    }

    pub fn from_parts(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        session: SessionConfig,
        storage: Storage,
    ) -> Self {
        Self {
            services: BlogServices::new(repos, passwords),
            tokens,
            session,
            storage,
        }
    }
}

fn in_memory() -> (Repositories, Storage) {
    (Arc::new(InMemoryStore::new()).repositories(), Storage::Memory)
}

#[cfg(feature = "postgres")]
async fn open_storage(db_config: Option<&DatabaseConfig>) -> (Repositories, Storage) {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => (connections.repositories(), Storage::Postgres(connections)),
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to connect to database. Using in-memory fallback."
            );
            in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_storage(db_config: Option<&DatabaseConfig>) -> (Repositories, Storage) {
    if db_config.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    tracing::info!("Running without postgres feature - using in-memory store");
    in_memory()
}
