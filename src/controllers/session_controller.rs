use std::sync::Arc;

use uuid::Uuid;

use crate::controllers::stop_controller::{StopController, CREATED_MESSAGE};
use crate::dto::api_response::ApiResponse;
use crate::dto::session_dto::{CaptureResponse, GpsFixRequest, MapClickRequest, SessionResponse};
use crate::dto::stop_dto::{StopFormRequest, StopResponse};
use crate::models::session::{CaptureSession, PendingForm};
use crate::services::CaptureSessionService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct SessionController {
    capture: Arc<CaptureSessionService>,
    stops: StopController,
}

/// Un campo vacío del formulario toma el valor pendiente de la sesión.
fn fill_blank(field: &mut String, pending: &str) {
    if field.trim().is_empty() {
        *field = pending.to_string();
    }
}

fn fill_blank_optional(field: &mut Option<String>, pending: &str) {
    let blank = field.as_deref().map_or(true, |v| v.trim().is_empty());
    if blank && !pending.is_empty() {
        *field = Some(pending.to_string());
    }
}

fn merge_pending(request: &mut StopFormRequest, session: &CaptureSession) {
    let pending: &PendingForm = &session.pending;
    fill_blank(&mut request.street, &pending.street);
    fill_blank_optional(&mut request.street_number, &pending.street_number);
    fill_blank(&mut request.neighborhood, &pending.neighborhood);
    fill_blank_optional(&mut request.postal_code, &pending.postal_code);
    request.latitude = Some(session.latitude);
    request.longitude = Some(session.longitude);
}

impl SessionController {
    pub fn new(state: &AppState) -> Self {
        Self {
            capture: state.capture.clone(),
            stops: StopController::new(state),
        }
    }

    pub async fn open(&self) -> SessionResponse {
        SessionResponse {
            session: self.capture.open().await,
            flash_message: None,
        }
    }

    /// Estado actual; el mensaje de éxito se entrega una sola vez
    pub async fn get(&self, id: Uuid) -> AppResult<SessionResponse> {
        let (session, flash_message) = self
            .capture
            .with_session(id, |s| {
                let flash = s.take_flash();
                (s.clone(), flash)
            })
            .await?;
        Ok(SessionResponse {
            session,
            flash_message,
        })
    }

    pub async fn gps(&self, id: Uuid, request: GpsFixRequest) -> AppResult<CaptureResponse> {
        self.capture.register_gps_fix(id, request.coordinates()).await
    }

    pub async fn map_click(&self, id: Uuid, request: MapClickRequest) -> AppResult<CaptureResponse> {
        self.capture
            .register_map_click(id, request.lat, request.lng)
            .await
    }

    /// Registra la parada en la coordenada de la sesión y la reinicia.
    pub async fn submit(
        &self,
        id: Uuid,
        mut request: StopFormRequest,
    ) -> AppResult<ApiResponse<StopResponse>> {
        let session = self.capture.snapshot(id).await?;
        merge_pending(&mut request, &session);

        let stop = self.stops.register(request).await?;
        log::info!("📍 Sessão {} cadastrou a parada {}", id, stop.id);
        self.finish_submission(id, session.latitude, session.longitude).await;

        Ok(ApiResponse::success_with_message(
            stop.into(),
            CREATED_MESSAGE.to_string(),
        ))
    }

    /// Reinicia la sesión después de guardar la parada. Si mientras tanto la
    /// sesión se movió conserva la nueva coordenada; si ya no existe solo se
    /// registra, porque la parada quedó guardada.
    async fn finish_submission(&self, id: Uuid, latitude: f64, longitude: f64) {
        let result = self
            .capture
            .with_session(id, |s| {
                if s.is_at(latitude, longitude) {
                    s.reset();
                }
                s.set_flash(CREATED_MESSAGE);
            })
            .await;
        if let Err(e) = result {
            log::warn!("⚠️ Sessão {} não reiniciada após o cadastro: {}", id, e);
        }
    }

    pub async fn close(&self, id: Uuid) -> AppResult<()> {
        self.capture.close(id).await
    }
}
