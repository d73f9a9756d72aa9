use serde::{Deserialize, Serialize};

use crate::models::geocoding::GeocodeOutcome;
use crate::models::session::CaptureSession;

/// Fallo informado por la API de posicionamiento del dispositivo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionError {
    PermissionDenied,
    Unavailable,
    Timeout,
}

// Resultado del GPS enviado por el navegador: coordenadas o error
#[derive(Debug, Default, Deserialize)]
pub struct GpsFixRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub error: Option<PositionError>,
}

impl GpsFixRequest {
    /// Coordenadas del fix, o el fallo a informar.
    pub fn coordinates(&self) -> Result<(f64, f64), PositionError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Ok((lat, lng)),
            _ => Err(PositionError::Unavailable),
        }
    }
}

// Click en el mapa (mismos nombres que el evento `last_clicked` del mapa)
#[derive(Debug, Deserialize)]
pub struct MapClickRequest {
    pub lat: f64,
    pub lng: f64,
}

// Estado de la sesión; el mensaje flash se consume al leerlo
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: CaptureSession,
    pub flash_message: Option<String>,
}

// Respuesta de GPS / click en el mapa
#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub session: CaptureSession,
    pub moved: bool,
    pub lookup: Option<GeocodeOutcome>,
    pub warning: Option<String>,
}
