//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::StopStore;
use crate::services::{CaptureSessionService, ReverseGeocoder, StopListCache};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: Arc<dyn StopStore>,
    pub list_cache: Arc<StopListCache>,
    pub capture: Arc<CaptureSessionService>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        store: Arc<dyn StopStore>,
        geocoder: Arc<dyn ReverseGeocoder>,
    ) -> Self {
        let list_cache = Arc::new(StopListCache::new(config.list_cache_ttl));
        let capture = Arc::new(CaptureSessionService::new(geocoder, config.session_ttl));
        Self {
            config,
            store,
            list_cache,
            capture,
        }
    }
}
