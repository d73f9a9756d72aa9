//! Utilidades de validación
//!
//! Funciones helper usadas por los `#[validate(custom = ...)]` de los DTOs
//! y por el control de campos obligatorios del formulario.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// CEP con o sin guion: 44000-000 o 44000000
    static ref CEP_REGEX: Regex = Regex::new(r"^\d{5}-?\d{3}$").unwrap();
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// `true` si el valor tiene forma de CEP completo
pub fn is_cep(value: &str) -> bool {
    CEP_REGEX.is_match(value.trim())
}

/// Validar formato de CEP brasileño
pub fn validate_cep(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || is_cep(value) {
        return Ok(());
    }
    let mut error = ValidationError::new("cep");
    error.add_param("value".into(), &value.to_string());
    error.add_param("format".into(), &"NNNNN-NNN".to_string());
    Err(error)
}

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Lista los rótulos de los campos obligatorios que llegaron vacíos.
pub fn missing_required<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| validate_not_empty(value).is_err())
        .map(|(label, _)| *label)
        .collect()
}

/// Rótulo del formulario para cada campo validado por el derive
fn field_label(field: &'static str) -> &'static str {
    match field {
        "external_code" => "Número da Parada",
        "street" => "Rua",
        "street_number" => "Número",
        "neighborhood" => "Bairro",
        "postal_code" => "CEP",
        "reference" => "Ponto de Referência",
        other => other,
    }
}

/// Convierte los errores del derive en un mensaje para el usuario.
pub fn describe_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<&str> = errors
        .field_errors()
        .keys()
        .copied()
        .map(field_label)
        .collect();
    fields.sort_unstable();
    format!("⚠️ Campos inválidos: {}", fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cep() {
        assert!(validate_cep("44000-000").is_ok());
        assert!(validate_cep("44000000").is_ok());
        assert!(validate_cep("").is_ok());
        assert!(validate_cep("4400-000").is_err());
        assert!(validate_cep("abcde-fgh").is_err());
        assert!(is_cep(" 44001-000 "));
        assert!(!is_cep("44001"));
        assert!(!is_cep(""));
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(-12.25, -38.95).is_ok());
        assert!(validate_coordinates(91.0, -38.95).is_err());
        assert!(validate_coordinates(-12.25, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_missing_required() {
        let fields = [("Rua", "Rua A"), ("Bairro", "  "), ("Ponto de Referência", "")];
        assert_eq!(missing_required(&fields), vec!["Bairro", "Ponto de Referência"]);
    }
}
