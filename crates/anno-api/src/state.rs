//! Application state shared across handlers.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use anno_db::Database;
use anno_pipeline::{JobEventBus, JobListener, JobService, N8nClient, N8nJobListener};
use anno_provider::{
    BlotatoConfig, BlotatoProvider, ProviderRegistry, RegistryConfig, SoraProvider, VideoProvider,
};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub db: Database,
    pub service: Arc<JobService>,
    pub registry: Arc<ProviderRegistry>,
}

impl AppState {
    /// Wire up the database, providers, event listeners, and job service.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let db = Database::open(&config.database_path)
            .with_context(|| format!("opening database at {}", config.database_path.display()))?;

        let blotato = BlotatoProvider::new(BlotatoConfig::from_env())
            .context("building Blotato client")?;
        let providers: Vec<Arc<dyn VideoProvider>> =
            vec![Arc::new(blotato), Arc::new(SoraProvider::new())];
        let registry = Arc::new(
            ProviderRegistry::new(providers, RegistryConfig::from_env()?)
                .context("building provider registry")?,
        );

        let mut listeners: Vec<Arc<dyn JobListener>> = Vec::new();
        if config.n8n_webhook_url.is_empty() {
            warn!("N8N_WEBHOOK_URL not set, completed videos will not be handed off");
        } else {
            let client =
                N8nClient::new(config.n8n_webhook_url.clone()).context("building n8n client")?;
            listeners.push(Arc::new(N8nJobListener::new(client)));
            info!("n8n handoff enabled");
        }
        let events = Arc::new(JobEventBus::new(listeners));

        let service = Arc::new(JobService::new(db.clone(), registry.clone(), events));

        Ok(Self {
            config,
            db,
            service,
            registry,
        })
    }
}
