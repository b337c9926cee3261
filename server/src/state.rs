// server/src/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use std::sync::Arc;
use storefront::store::{CartStore, LegalPageStore, MemoryStore, PgStore, ProductStore};
use storefront::{CartService, CatalogService, LegalPageService, LocalImageStore, MemorySessionCache};
use tracing::info;

const MAX_DB_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct AppState {
  pub cart: CartService,
  pub catalog: CatalogService,
  pub legal: LegalPageService,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires every service to one store backend. The quick-cache is per process.
  pub fn with_store<S>(config: Arc<AppConfig>, store: Arc<S>) -> Self
  where
    S: ProductStore + CartStore + LegalPageStore + 'static,
  {
    let quick_cache = Arc::new(MemorySessionCache::with_idle_ttl(config.session_idle_ttl));
    let images = Arc::new(LocalImageStore::new(config.image_dir.clone()));
    Self {
      cart: CartService::new(store.clone(), store.clone(), quick_cache),
      catalog: CatalogService::new(store.clone(), images, config.max_image_kb),
      legal: LegalPageService::new(store),
      config,
    }
  }

  pub fn in_memory(config: Arc<AppConfig>) -> Self {
    Self::with_store(config, Arc::new(MemoryStore::new()))
  }

  /// Postgres when `DATABASE_URL` is configured, memory otherwise.
  pub async fn from_config(config: Arc<AppConfig>) -> Result<Self> {
    let Some(database_url) = config.database_url.clone() else {
      info!("No DATABASE_URL configured; using the in-memory store.");
      return Ok(Self::in_memory(config));
    };

    let store = PgStore::connect(&database_url, MAX_DB_CONNECTIONS).await?;
    if config.run_migrations {
      store.migrate().await?;
    }
    Ok(Self::with_store(config, Arc::new(store)))
  }
}
