use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::stop::coordinate_to_decimal;
use crate::models::{Direction, FixtureType, Stop, StopDraft};
use crate::services::report_service::StopFilter;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::text::{blank_to_none, file_name_only};
use crate::utils::validation::{
    describe_validation_errors, missing_required, validate_cep, validate_coordinates,
};

// Request del formulario de registro/edición de una parada
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StopFormRequest {
    #[validate(length(max = 50))]
    pub external_code: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub street: String,
    #[validate(length(max = 20))]
    pub street_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub neighborhood: String,
    #[validate(length(max = 10), custom = "validate_cep")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub reference: String,
    pub direction: Option<String>,
    pub fixture_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo_name: Option<String>,
}

impl StopFormRequest {
    /// Recorta todos los textos y convierte los opcionales vacíos en `None`.
    fn normalized(self) -> Self {
        Self {
            external_code: blank_to_none(self.external_code),
            street: self.street.trim().to_string(),
            street_number: blank_to_none(self.street_number),
            neighborhood: self.neighborhood.trim().to_string(),
            postal_code: blank_to_none(self.postal_code),
            reference: self.reference.trim().to_string(),
            direction: blank_to_none(self.direction),
            fixture_type: blank_to_none(self.fixture_type),
            latitude: self.latitude,
            longitude: self.longitude,
            photo_name: blank_to_none(self.photo_name.map(|p| file_name_only(&p))),
        }
    }

    /// Valida el formulario y lo convierte en un borrador listo para guardar.
    ///
    /// Los obligatorios se comprueban primero para devolver un único mensaje
    /// con todos los campos faltantes. Las reglas de formato se aplican sobre
    /// los valores ya recortados.
    pub fn into_draft(self) -> AppResult<StopDraft> {
        let form = self.normalized();
        let direction = form.direction.clone().unwrap_or_default();
        let fixture_type = form.fixture_type.clone().unwrap_or_default();

        let mut missing = missing_required(&[
            ("Rua", form.street.as_str()),
            ("Bairro", form.neighborhood.as_str()),
            ("Ponto de Referência", form.reference.as_str()),
            ("Tipo", fixture_type.as_str()),
            ("Sentido", direction.as_str()),
        ]);
        if form.latitude.is_none() {
            missing.push("Latitude");
        }
        if form.longitude.is_none() {
            missing.push("Longitude");
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "⚠️ Campos obrigatórios não preenchidos: {}",
                missing.join(", ")
            )));
        }

        form.validate()
            .map_err(|e| AppError::Validation(describe_validation_errors(&e)))?;

        let direction: Direction = direction.parse().map_err(AppError::Validation)?;
        let fixture_type: FixtureType = fixture_type.parse().map_err(AppError::Validation)?;

        let (Some(lat), Some(lng)) = (form.latitude, form.longitude) else {
            return Err(AppError::Validation("Coordenadas inválidas".to_string()));
        };
        validate_coordinates(lat, lng)
            .map_err(|_| AppError::Validation("Coordenadas fora do intervalo válido".to_string()))?;
        let (latitude, longitude) = match (coordinate_to_decimal(lat), coordinate_to_decimal(lng)) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(AppError::Validation("Coordenadas inválidas".to_string())),
        };

        Ok(StopDraft {
            external_code: form.external_code,
            street: form.street,
            street_number: form.street_number,
            neighborhood: form.neighborhood,
            postal_code: form.postal_code,
            reference: form.reference,
            direction,
            fixture_type,
            latitude,
            longitude,
            photo_name: form.photo_name,
        })
    }
}

// Response de parada
#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub id: i32,
    pub external_code: Option<String>,
    pub street: String,
    pub street_number: Option<String>,
    pub neighborhood: String,
    pub postal_code: Option<String>,
    pub reference: String,
    pub direction: Direction,
    pub fixture_type: FixtureType,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Stop> for StopResponse {
    fn from(stop: Stop) -> Self {
        Self {
            id: stop.id,
            external_code: stop.external_code,
            street: stop.street,
            street_number: stop.street_number,
            neighborhood: stop.neighborhood,
            postal_code: stop.postal_code,
            reference: stop.reference,
            direction: stop.direction,
            fixture_type: stop.fixture_type,
            latitude: stop.latitude.to_f64().unwrap_or_default(),
            longitude: stop.longitude.to_f64().unwrap_or_default(),
            photo_name: stop.photo_name,
            created_at: stop.created_at,
        }
    }
}

// Query de filtros: bairros separados por coma y trecho de la rua
#[derive(Debug, Default, Deserialize)]
pub struct StopFilterQuery {
    pub bairros: Option<String>,
    pub rua: Option<String>,
}

impl From<StopFilterQuery> for StopFilter {
    fn from(query: StopFilterQuery) -> Self {
        let neighborhoods = query
            .bairros
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|b| !b.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        StopFilter::new(neighborhoods, query.rua)
    }
}

// Query del borrado: la confirmación es obligatoria
#[derive(Debug, Default, Deserialize)]
pub struct DeleteStopQuery {
    pub confirmar: Option<bool>,
}

// Valores permitidos en los selects del formulario
#[derive(Debug, Serialize)]
pub struct FormOptionsResponse {
    pub directions: Vec<&'static str>,
    pub fixture_types: Vec<&'static str>,
}

impl FormOptionsResponse {
    pub fn canonical() -> Self {
        Self {
            directions: Direction::ALL.iter().map(Direction::as_str).collect(),
            fixture_types: FixtureType::ALL.iter().map(FixtureType::as_str).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> StopFormRequest {
        StopFormRequest {
            external_code: Some("  ".into()),
            street: " Rua X ".into(),
            street_number: Some("12".into()),
            neighborhood: "Centro".into(),
            postal_code: Some("44000-000".into()),
            reference: "Em frente à farmácia".into(),
            direction: Some("PC1-PC2".into()),
            fixture_type: Some("Abrigo".into()),
            latitude: Some(-12.2501),
            longitude: Some(-38.9502),
            photo_name: Some("/home/u/fotos/p1.jpg".into()),
        }
    }

    #[test]
    fn test_valid_form_becomes_draft() {
        let draft = valid_form().into_draft().unwrap();
        assert_eq!(draft.external_code, None);
        assert_eq!(draft.street, "Rua X");
        assert_eq!(draft.direction, Direction::Pc1ToPc2);
        assert_eq!(draft.fixture_type, FixtureType::Shelter);
        assert_eq!(draft.latitude.to_string(), "-12.2501");
        assert_eq!(draft.photo_name.as_deref(), Some("p1.jpg"));
    }

    #[test]
    fn test_missing_required_fields_are_listed() {
        let form = StopFormRequest {
            neighborhood: "".into(),
            reference: " ".into(),
            fixture_type: None,
            ..valid_form()
        };
        let err = form.into_draft().unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("Bairro"));
                assert!(msg.contains("Ponto de Referência"));
                assert!(msg.contains("Tipo"));
                assert!(!msg.contains("Rua,"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_enum_and_cep_rejected() {
        let form = StopFormRequest {
            fixture_type: Some("Totem".into()),
            ..valid_form()
        };
        assert!(matches!(form.into_draft(), Err(AppError::Validation(_))));

        let form = StopFormRequest {
            postal_code: Some("44-0".into()),
            ..valid_form()
        };
        assert!(matches!(form.into_draft(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_padded_values_are_trimmed_before_validation() {
        let form = StopFormRequest {
            postal_code: Some(" 44000-000 ".into()),
            street_number: Some(format!("{:<25}", "12")),
            ..valid_form()
        };
        let draft = form.into_draft().unwrap();
        assert_eq!(draft.postal_code.as_deref(), Some("44000-000"));
        assert_eq!(draft.street_number.as_deref(), Some("12"));
    }

    #[test]
    fn test_format_errors_use_field_labels() {
        let form = StopFormRequest {
            postal_code: Some("44-0".into()),
            ..valid_form()
        };
        match form.into_draft() {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("CEP"));
                assert!(!msg.contains("postal_code"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let form = StopFormRequest {
            latitude: Some(120.0),
            ..valid_form()
        };
        assert!(matches!(form.into_draft(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_filter_query_splits_neighborhoods() {
        let filter: StopFilter = StopFilterQuery {
            bairros: Some("Centro, Tomba,,".into()),
            rua: Some("ave".into()),
        }
        .into();
        assert_eq!(filter.neighborhoods().len(), 2);
    }
}
