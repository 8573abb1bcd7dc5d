use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::{AppConfig, JwtConfig};
use crate::content::repo::{ContentRepo, PgContentRepo};
use crate::films::repo::{FilmRepo, PgFilmRepo};
use crate::memory::MemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub films: Arc<dyn FilmRepo>,
    pub content: Arc<dyn ContentRepo>,
    pub users: Arc<dyn UserRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let Some(url) = config.database_url.as_deref() else {
            warn!("DATABASE_URL not set; records live in memory and vanish on restart");
            return Ok(Self::in_memory(config, MemoryStore::new()));
        };

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            warn!(error = %e, "migration failed; continuing");
        }
        info!("connected to postgres");

        Ok(Self {
            films: Arc::new(PgFilmRepo::new(db.clone())),
            content: Arc::new(PgContentRepo::new(db.clone())),
            users: Arc::new(PgUserRepo::new(db)),
            config,
        })
    }

    /// All three repos served by one shared [`MemoryStore`].
    pub fn in_memory(config: Arc<AppConfig>, store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            config,
            films: store.clone(),
            content: store.clone(),
            users: store,
        }
    }

    /// In-memory state with fixed test credentials.
    pub fn fake() -> Self {
        Self::fake_with(MemoryStore::new())
    }

    pub fn fake_with(store: MemoryStore) -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            max_connections: 1,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
        });
        Self::in_memory(config, store)
    }
}
