//! Shared state for command handlers: config, API client and draft store.

use std::path::Path;

use anyhow::Context;
use socialspark_api::{ClientOptions, PollPolicy, SocialSparkClient};
use socialspark_core::{load_brand_presets, AppConfig, BrandPresets};
use socialspark_store::{connect_pool, DraftStore, LocalDraftStore, PgDraftStore, PoolConfig};
use tokio_util::sync::CancellationToken;

pub(crate) struct App {
    pub(crate) config: AppConfig,
    pub(crate) client: SocialSparkClient,
    pub(crate) store: Box<dyn DraftStore>,
}

impl App {
    /// Builds the client and opens the draft store (Postgres when
    /// `DATABASE_URL` is set, otherwise the local JSON file).
    pub(crate) async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = SocialSparkClient::new(ClientOptions::from_app_config(&config))
            .context("failed to build API client")?;

        let store: Box<dyn DraftStore> = match &config.database_url {
            Some(url) => {
                let pool = connect_pool(url, PoolConfig::default())
                    .await
                    .context("failed to connect to DATABASE_URL")?;
                tracing::debug!("using postgres draft store");
                Box::new(PgDraftStore::new(pool))
            }
            None => {
                let store = LocalDraftStore::open(&config.store_path)
                    .await
                    .with_context(|| {
                        format!("failed to open draft store {}", config.store_path.display())
                    })?;
                Box::new(store)
            }
        };

        Ok(Self {
            config,
            client,
            store,
        })
    }

    pub(crate) fn poll_policy(&self) -> PollPolicy {
        PollPolicy::from_app_config(&self.config)
    }

    /// Looks `name` up in the brands file. Falls back to presets carrying
    /// only the name when the file or the entry is missing.
    pub(crate) fn brand_presets(&self, name: Option<&str>) -> anyhow::Result<BrandPresets> {
        let path: &Path = &self.config.brands_path;
        let Some(name) = name else {
            return Ok(BrandPresets::named("My Business"));
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no brands file; using bare preset");
            return Ok(BrandPresets::named(name));
        }
        let file = load_brand_presets(path)
            .with_context(|| format!("failed to load brand presets from {}", path.display()))?;
        Ok(file.find(name).cloned().unwrap_or_else(|| {
            tracing::warn!(brand = name, "brand not in presets file; using bare preset");
            BrandPresets::named(name)
        }))
    }
}

/// A token cancelled on Ctrl-C.
pub(crate) fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; cancelling");
            trigger.cancel();
        }
    });
    token
}
