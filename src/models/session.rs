//! Sesión de captura
//!
//! Estado de una sesión de registro: coordenada actual, valores pendientes
//! del formulario (rellenados por el geocoder) y el mensaje de éxito que
//! se muestra una sola vez.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::geocoding::{ExtractedAddress, GeocodeOutcome};
use crate::utils::validation::is_cep;

/// Coordenada inicial: centro de Feira de Santana
pub const DEFAULT_LATITUDE: f64 = -12.25;
pub const DEFAULT_LONGITUDE: f64 = -38.95;

/// Valores del formulario que todavía no se han enviado
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PendingForm {
    pub street: String,
    pub street_number: String,
    pub neighborhood: String,
    pub postal_code: String,
}

impl PendingForm {
    fn stage_address(&mut self, address: &ExtractedAddress) {
        self.street = address.street.clone();
        self.street_number = address.house_number.clone();
        self.neighborhood = address.neighborhood.clone();
        // un código postal incompleto no se propone como CEP
        self.postal_code = if is_cep(&address.postal_code) {
            address.postal_code.trim().to_string()
        } else {
            String::new()
        };
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaptureSession {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub pending: PendingForm,
    pub last_lookup: Option<GeocodeOutcome>,
    #[serde(skip)]
    flash_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl CaptureSession {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            pending: PendingForm::default(),
            last_lookup: None,
            flash_message: None,
            created_at: now,
            last_seen: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now() - self.last_seen > ttl
    }

    pub fn is_at(&self, latitude: f64, longitude: f64) -> bool {
        self.latitude == latitude && self.longitude == longitude
    }

    /// Mueve la coordenada actual. Devuelve `false` si ya estaba ahí.
    pub fn move_to(&mut self, latitude: f64, longitude: f64) -> bool {
        if self.is_at(latitude, longitude) {
            return false;
        }
        self.latitude = latitude;
        self.longitude = longitude;
        true
    }

    /// Aplica el resultado de la búsqueda hecha para (latitude, longitude).
    ///
    /// Si mientras tanto la sesión se movió a otra coordenada el resultado
    /// se descarta. Solo `Found` toca los valores pendientes; la coordenada
    /// nunca se invalida por un fallo del geocoder.
    pub fn apply_lookup(&mut self, latitude: f64, longitude: f64, outcome: GeocodeOutcome) -> bool {
        if !self.is_at(latitude, longitude) {
            return false;
        }
        if let GeocodeOutcome::Found(address) = &outcome {
            self.pending.stage_address(address);
        }
        self.last_lookup = Some(outcome);
        true
    }

    /// Vuelve al estado inicial después de un registro exitoso.
    pub fn reset(&mut self) {
        self.latitude = DEFAULT_LATITUDE;
        self.longitude = DEFAULT_LONGITUDE;
        self.pending = PendingForm::default();
        self.last_lookup = None;
    }

    pub fn set_flash(&mut self, message: impl Into<String>) {
        self.flash_message = Some(message.into());
    }

    /// El mensaje se entrega una sola vez.
    pub fn take_flash(&mut self) -> Option<String> {
        self.flash_message.take()
    }
}
