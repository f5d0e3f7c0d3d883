use crate::config::Config;
use crate::token::TokenAuthority;
use nover_store::{BookStore, ChapterStore, ReferenceStore, ReviewStore, SqliteStore, UserStore};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookStore>,
    pub chapters: Arc<dyn ChapterStore>,
    pub reference: Arc<dyn ReferenceStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub tokens: Arc<TokenAuthority>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store = match &config.database.path {
            Some(path) => {
                tracing::info!("Opening SQLite database at {}", path);
                SqliteStore::open(path)?
            }
            None => {
                tracing::warn!("No database.path configured, using in-memory SQLite");
                SqliteStore::in_memory()?
            }
        };

        if config.database.seed_reference_data {
            store.seed_reference_data()?;
        }

        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Wire every store handle to one SQLite backend
    pub fn with_store(config: &Config, store: Arc<SqliteStore>) -> Self {
        Self {
            users: store.clone(),
            books: store.clone(),
            chapters: store.clone(),
            reference: store.clone(),
            reviews: store,
            tokens: Arc::new(TokenAuthority::new(&config.auth)),
            config: Arc::new(config.clone()),
        }
    }
}
