use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::{AdminConfig, AppConfig, JwtConfig};
use crate::store::{MemoryStore, PgStore, SessionStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub jwt: JwtKeys,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(PgStore::connect(&config.database_url).await?);

        if let Err(e) = sqlx::migrate!("./migrations").run(store.pool()).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let jwt = JwtKeys::new(&config.jwt);
        Ok(Self {
            users: store.clone(),
            sessions: store,
            jwt,
            config,
        })
    }

    /// State backed by the in-memory store; used by the schema tests.
    pub fn in_memory() -> Self {
        let config = Arc::new(AppConfig {
            database_url: "unused".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_hours: 24,
            },
            admin: AdminConfig {
                email: "admin@example.com".into(),
                password: "admin123".into(),
            },
        });
        let store = Arc::new(MemoryStore::new());
        let jwt = JwtKeys::new(&config.jwt);
        Self {
            users: store.clone(),
            sessions: store,
            jwt,
            config,
        }
    }
}
