//! Modelo de Parada
//!
//! Este módulo contiene el struct `Stop` (una fila de la tabla `paradas`),
//! el borrador usado para insertar/editar y los valores enumerados del
//! formulario.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sentido de circulación que atiende la parada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "PC1 - PC2", alias = "PC1-PC2")]
    Pc1ToPc2,
    #[serde(rename = "PC2 - PC1", alias = "PC2-PC1")]
    Pc2ToPc1,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Pc1ToPc2, Direction::Pc2ToPc1];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Pc1ToPc2 => "PC1 - PC2",
            Direction::Pc2ToPc1 => "PC2 - PC1",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.to_uppercase().as_str() {
            "PC1-PC2" => Ok(Direction::Pc1ToPc2),
            "PC2-PC1" => Ok(Direction::Pc2ToPc1),
            _ => Err(format!("Sentido inválido: '{}'", value.trim())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de infraestructura física de la parada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixtureType {
    #[serde(rename = "Placa")]
    Sign,
    #[serde(rename = "Abrigo")]
    Shelter,
    #[serde(rename = "Abrigo + Placa")]
    ShelterAndSign,
    #[serde(rename = "Sem Identificação")]
    Unmarked,
}

impl FixtureType {
    pub const ALL: [FixtureType; 4] = [
        FixtureType::Sign,
        FixtureType::Shelter,
        FixtureType::ShelterAndSign,
        FixtureType::Unmarked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureType::Sign => "Placa",
            FixtureType::Shelter => "Abrigo",
            FixtureType::ShelterAndSign => "Abrigo + Placa",
            FixtureType::Unmarked => "Sem Identificação",
        }
    }
}

impl FromStr for FixtureType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();
        FixtureType::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("Tipo inválido: '{}'", value.trim()))
    }
}

impl fmt::Display for FixtureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parada persistida - mapea a la tabla `paradas`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: i32,
    pub external_code: Option<String>,
    pub street: String,
    pub street_number: Option<String>,
    pub neighborhood: String,
    pub postal_code: Option<String>,
    pub reference: String,
    pub direction: Direction,
    pub fixture_type: FixtureType,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub photo_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Valores ya validados para insertar o reemplazar una parada.
///
/// No lleva `id` ni `created_at`: ambos los pone el store y nunca cambian.
#[derive(Debug, Clone, PartialEq)]
pub struct StopDraft {
    pub external_code: Option<String>,
    pub street: String,
    pub street_number: Option<String>,
    pub neighborhood: String,
    pub postal_code: Option<String>,
    pub reference: String,
    pub direction: Direction,
    pub fixture_type: FixtureType,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub photo_name: Option<String>,
}

impl Stop {
    /// Construye la fila que produciría un INSERT del borrador.
    pub fn from_draft(id: i32, draft: StopDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            external_code: draft.external_code,
            street: draft.street,
            street_number: draft.street_number,
            neighborhood: draft.neighborhood,
            postal_code: draft.postal_code,
            reference: draft.reference,
            direction: draft.direction,
            fixture_type: draft.fixture_type,
            latitude: draft.latitude,
            longitude: draft.longitude,
            photo_name: draft.photo_name,
            created_at,
        }
    }

    /// Reemplaza los campos editables conservando id y fecha de registro.
    pub fn apply_draft(&mut self, draft: StopDraft) {
        let id = self.id;
        let created_at = self.created_at;
        *self = Stop::from_draft(id, draft, created_at);
    }
}

/// Redondea una coordenada a los 8 decimales de la columna NUMERIC.
pub fn coordinate_to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|d| d.round_dp(8).normalize())
}
