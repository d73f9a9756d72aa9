//! Captura de ubicación
//!
//! Maneja las sesiones de registro: cada una guarda la coordenada actual y
//! los valores pendientes del formulario. GPS y click en el mapa terminan
//! en el mismo flujo: mover la coordenada, pedir la dirección al geocoder
//! y aplicar el resultado a la sesión.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::session_dto::{CaptureResponse, PositionError};
use crate::models::session::CaptureSession;
use crate::services::geocoding_service::ReverseGeocoder;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_coordinates;

pub const LOCATION_PERMISSION_WARNING: &str = "Permita o acesso à localização no navegador.";

pub struct CaptureSessionService {
    sessions: Arc<RwLock<HashMap<Uuid, CaptureSession>>>,
    geocoder: Arc<dyn ReverseGeocoder>,
    ttl: chrono::Duration,
}

impl CaptureSessionService {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>, ttl: chrono::Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            geocoder,
            ttl,
        }
    }

    /// Abre una sesión nueva en la coordenada por defecto.
    pub async fn open(&self) -> CaptureSession {
        self.cleanup_expired().await;

        let session = CaptureSession::new(Uuid::new_v4());
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session.clone());
        log::info!("🆕 Sessão de cadastro {} aberta ({} ativas)", session.id, sessions.len());
        session
    }

    /// Ejecuta `f` sobre la sesión y devuelve su resultado.
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut CaptureSession) -> T,
    ) -> AppResult<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .filter(|s| !s.is_expired(self.ttl))
            .ok_or_else(|| AppError::NotFound(format!("Sessão {} não encontrada ou expirada", id)))?;
        session.touch();
        Ok(f(session))
    }

    pub async fn snapshot(&self, id: Uuid) -> AppResult<CaptureSession> {
        self.with_session(id, |s| s.clone()).await
    }

    pub async fn close(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Sessão {} não encontrada", id)))
    }

    /// Resultado de la API de posicionamiento del dispositivo.
    pub async fn register_gps_fix(
        &self,
        id: Uuid,
        fix: Result<(f64, f64), PositionError>,
    ) -> AppResult<CaptureResponse> {
        match fix {
            Ok((latitude, longitude)) => self.move_and_lookup(id, latitude, longitude).await,
            Err(error) => {
                log::warn!("📍 GPS indisponível na sessão {}: {:?}", id, error);
                let session = self.snapshot(id).await?;
                Ok(CaptureResponse {
                    session,
                    moved: false,
                    lookup: None,
                    warning: Some(LOCATION_PERMISSION_WARNING.to_string()),
                })
            }
        }
    }

    /// Click en el mapa.
    pub async fn register_map_click(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<CaptureResponse> {
        self.move_and_lookup(id, latitude, longitude).await
    }

    async fn move_and_lookup(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<CaptureResponse> {
        validate_coordinates(latitude, longitude)
            .map_err(|_| AppError::Validation("Coordenadas fora do intervalo válido".to_string()))?;

        let moved = self
            .with_session(id, |s| s.move_to(latitude, longitude))
            .await?;
        if !moved {
            let session = self.snapshot(id).await?;
            return Ok(CaptureResponse {
                session,
                moved: false,
                lookup: None,
                warning: None,
            });
        }

        // el lock no se mantiene durante la búsqueda
        let outcome = self.geocoder.reverse(latitude, longitude).await;
        let warning = outcome.warning();

        let session = self
            .with_session(id, |s| {
                if !s.apply_lookup(latitude, longitude, outcome.clone()) {
                    log::debug!("🔁 Resultado de geocodificação descartado na sessão {}", s.id);
                }
                s.clone()
            })
            .await?;

        Ok(CaptureResponse {
            session,
            moved: true,
            lookup: Some(outcome),
            warning,
        })
    }

    async fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl));
        let removed = before - sessions.len();
        if removed > 0 {
            log::info!("🧹 {} sessões expiradas removidas", removed);
        }
    }
}
