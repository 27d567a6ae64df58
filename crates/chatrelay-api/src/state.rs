//! Application state wiring the session manager to concrete infrastructure.
//!
//! `SessionManager` is generic over store and backend traits; `AppState`
//! pins it to the boxed variants so the store and backend can be chosen from
//! configuration at runtime.

use std::path::Path;
use std::sync::Arc;

use chatrelay_core::llm::box_backend::BoxInferenceBackend;
use chatrelay_core::session::manager::SessionManager;
use chatrelay_core::store::box_store::BoxSessionStore;
use chatrelay_infra::config::resolve_api_token;
use chatrelay_infra::llm::create_backend;
use chatrelay_infra::memory::MemorySessionStore;
use chatrelay_infra::sqlite::pool::{DatabasePool, database_url_for};
use chatrelay_infra::sqlite::session::SqliteSessionStore;
use chatrelay_types::config::{RelayConfig, StoreConfig, StoreKind};

/// Session manager pinned to runtime-selected implementations.
pub type RelayManager = SessionManager<BoxSessionStore, BoxInferenceBackend>;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<RelayManager>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    pub fn new(manager: RelayManager, config: RelayConfig) -> Self {
        Self {
            manager: Arc::new(manager),
            config: Arc::new(config),
        }
    }

    /// Validate the config, open the store and build the backend.
    pub async fn init(config: RelayConfig, data_dir: &Path) -> anyhow::Result<Self> {
        config.validate()?;

        let store = open_store(&config.store, data_dir).await?;
        let api_key = resolve_api_token(&config.backend)?;
        let backend = create_backend(&config.backend, api_key)?;

        tracing::info!(
            backend = %config.backend.kind,
            model = %config.generation.model,
            store = ?config.store.kind,
            window_size = config.session.window_size,
            "Relay initialized"
        );

        let manager = SessionManager::new(store, backend, &config);
        Ok(Self::new(manager, config))
    }
}

/// Open the configured session store.
///
/// SQLite defaults to `{data_dir}/sessions.db`, creating the directory.
pub async fn open_store(config: &StoreConfig, data_dir: &Path) -> anyhow::Result<BoxSessionStore> {
    match config.kind {
        StoreKind::Memory => Ok(BoxSessionStore::new(MemorySessionStore::new())),
        StoreKind::Sqlite => {
            let url = match config.database_url.clone() {
                Some(url) => url,
                None => {
                    tokio::fs::create_dir_all(data_dir).await?;
                    database_url_for(data_dir)
                }
            };
            tracing::debug!(%url, "Opening session database");
            let pool = DatabasePool::connect(&url).await?;
            Ok(BoxSessionStore::new(SqliteSessionStore::new(pool)))
        }
    }
}
