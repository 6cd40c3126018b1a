//! Application context shared across route handlers via Axum state.

use std::sync::Arc;
use std::time::Duration;

use cr_core::config::Config;
use cr_extract::ExtractionGateway;

use crate::cache::ResultCache;

/// Everything a handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub gateway: Arc<ExtractionGateway>,
    pub cache: Arc<ResultCache>,
}

impl AppContext {
    pub fn new(config: Config, gateway: ExtractionGateway) -> Self {
        let cache = ResultCache::new(
            config.cache.enabled,
            Duration::from_secs(config.cache.ttl_secs),
        );
        Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            cache: Arc::new(cache),
        }
    }
}
