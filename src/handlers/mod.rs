pub mod cache;
pub mod error;
pub mod health;
pub mod market;

use crate::config::Settings;
use crate::models::MarketData;
use crate::services::cache::TtlCache;

/// Shared by every request handler.
pub struct AppState {
    pub settings: Settings,
    pub cache: TtlCache<MarketData>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let cache = TtlCache::new(settings.cache_ttl);
        AppState { settings, cache }
    }
}
