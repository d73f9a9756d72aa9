use std::sync::Arc;

use crate::models::report::DashboardReport;
use crate::repositories::StopStore;
use crate::services::report_service::{self, StopFilter};
use crate::services::StopListCache;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct DashboardController {
    store: Arc<dyn StopStore>,
    cache: Arc<StopListCache>,
}

impl DashboardController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            cache: state.list_cache.clone(),
        }
    }

    /// Indicadores sobre el conjunto filtrado (o todas las paradas)
    pub async fn summary(&self, filter: StopFilter) -> AppResult<DashboardReport> {
        let stops = self.cache.get_or_load(self.store.as_ref()).await?;
        let selected = filter.apply(&stops);
        log::debug!(
            "📊 Dashboard sobre {} de {} paradas (bairros: {:?})",
            selected.len(),
            stops.len(),
            filter.neighborhoods()
        );
        Ok(report_service::build_dashboard(&selected))
    }
}
