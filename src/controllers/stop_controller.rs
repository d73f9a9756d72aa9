use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;

use crate::dto::api_response::ApiResponse;
use crate::dto::stop_dto::{StopFormRequest, StopResponse};
use crate::models::report::{MapView, StopSelectionItem};
use crate::models::Stop;
use crate::repositories::StopStore;
use crate::services::report_service::{self, StopFilter};
use crate::services::StopListCache;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub const CREATED_MESSAGE: &str = "✅ Parada cadastrada com sucesso!";
pub const UPDATED_MESSAGE: &str = "✅ Parada atualizada com sucesso!";
pub const DELETED_MESSAGE: &str = "🗑️ Parada excluída com sucesso!";
pub const DELETE_CONFIRMATION_REQUIRED: &str = "Marque a confirmação para excluir.";

pub struct StopController {
    store: Arc<dyn StopStore>,
    cache: Arc<StopListCache>,
}

impl StopController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            cache: state.list_cache.clone(),
        }
    }

    /// Valida y guarda una parada nueva.
    pub async fn register(&self, request: StopFormRequest) -> AppResult<Stop> {
        let draft = request.into_draft()?;
        let stop = self.store.create(draft).await?;
        self.cache.invalidate().await;
        Ok(stop)
    }

    pub async fn create(&self, request: StopFormRequest) -> AppResult<ApiResponse<StopResponse>> {
        let stop = self.register(request).await?;
        Ok(ApiResponse::success_with_message(
            stop.into(),
            CREATED_MESSAGE.to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<StopResponse> {
        let stop = self.store.get(id).await?.ok_or_else(|| not_found_error(id))?;
        Ok(stop.into())
    }

    pub async fn list(&self, filter: StopFilter) -> AppResult<Vec<StopResponse>> {
        let stops = self.cache.get_or_load(self.store.as_ref()).await?;
        Ok(filter
            .apply(&stops)
            .into_iter()
            .cloned()
            .map(StopResponse::from)
            .collect())
    }

    /// Edita todos los campos. Coordenadas y foto ausentes conservan el valor actual.
    pub async fn update(
        &self,
        id: i32,
        mut request: StopFormRequest,
    ) -> AppResult<ApiResponse<StopResponse>> {
        let current = self.store.get(id).await?.ok_or_else(|| not_found_error(id))?;

        request.latitude = request.latitude.or(current.latitude.to_f64());
        request.longitude = request.longitude.or(current.longitude.to_f64());
        let mut draft = request.into_draft()?;
        if draft.photo_name.is_none() {
            draft.photo_name = current.photo_name;
        }

        let stop = self.store.update(id, draft).await?;
        self.cache.invalidate().await;

        Ok(ApiResponse::success_with_message(
            stop.into(),
            UPDATED_MESSAGE.to_string(),
        ))
    }

    /// El borrado exige la confirmación explícita del usuario.
    pub async fn delete(&self, id: i32, confirmed: bool) -> AppResult<ApiResponse<()>> {
        if !confirmed {
            return Err(bad_request_error(DELETE_CONFIRMATION_REQUIRED));
        }

        self.store.delete(id).await?;
        self.cache.invalidate().await;
        Ok(ApiResponse::message_only(DELETED_MESSAGE.to_string()))
    }

    pub async fn neighborhoods(&self) -> AppResult<Vec<String>> {
        let stops = self.cache.get_or_load(self.store.as_ref()).await?;
        Ok(report_service::neighborhood_options(&stops))
    }

    pub async fn selection(&self) -> AppResult<Vec<StopSelectionItem>> {
        let stops = self.cache.get_or_load(self.store.as_ref()).await?;
        Ok(report_service::selection_list(&stops))
    }

    pub async fn map(&self, filter: StopFilter) -> AppResult<MapView> {
        let stops = self.cache.get_or_load(self.store.as_ref()).await?;
        Ok(report_service::build_map_view(&filter.apply(&stops)))
    }
}
