// Application state module
// Shared, read-only state handed to every request

use std::sync::Arc;

use super::types::Config;
use crate::asset_cache::{AssetCache, AssetFetcher, StaticDirFetcher};
use crate::contact::{HttpMailRelay, MailRelay};
use crate::http::CorsPolicy;

/// Application state
pub struct AppState {
    pub config: Config,
    pub cors: CorsPolicy,
    pub relay: Arc<dyn MailRelay>,
    pub assets: AssetCache,
    pub origin: Arc<dyn AssetFetcher>,
}

impl AppState {
    /// Wire the production collaborators from configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let relay = Arc::new(HttpMailRelay::new(config.mail.clone())?);
        let origin = Arc::new(StaticDirFetcher::with_index(
            &config.assets.root,
            &config.assets.index_file,
        ));
        Ok(Self::with_collaborators(config, relay, origin))
    }

    /// Build state around caller-supplied relay and asset origin
    pub fn with_collaborators(
        config: &Config,
        relay: Arc<dyn MailRelay>,
        origin: Arc<dyn AssetFetcher>,
    ) -> Self {
        Self {
            config: config.clone(),
            cors: CorsPolicy::from_config(&config.cors),
            relay,
            assets: AssetCache::new(&config.assets.cache_name, config.assets.manifest.clone()),
            origin,
        }
    }
}
