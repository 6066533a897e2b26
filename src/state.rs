use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, JobService, SeaOrmAuthService, SeaOrmJobService};

/// Collaborators wired once at startup and shared by every request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub job_service: Arc<dyn JobService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::from_config(&config.general).await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let job_service = Arc::new(SeaOrmJobService::new(store.clone())) as Arc<dyn JobService>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            job_service,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
