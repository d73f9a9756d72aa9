use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::environment::GeocoderConfig;
use crate::models::geocoding::{ExtractedAddress, GeocodeOutcome};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::text::normalize_text;
use crate::utils::validation::is_cep;

/// Sinónimos de cada campo, en orden de prioridad
const STREET_KEYS: [&str; 3] = ["road", "street", "pedestrian"];
const NEIGHBORHOOD_KEYS: [&str; 3] = ["suburb", "neighbourhood", "quarter"];

/// Búsqueda inversa: coordenada -> dirección
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64) -> GeocodeOutcome;
}

#[derive(Debug, Deserialize)]
struct NominatimReverseResponse {
    address: Option<Map<String, Value>>,
    error: Option<String>,
}

/// Primer sinónimo con texto no vacío
fn first_present(address: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| address.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Extrae rua, número, bairro y CEP de la estructura `address` del geocoder.
pub fn extract_address(address: &Map<String, Value>) -> ExtractedAddress {
    ExtractedAddress {
        street: normalize_text(&first_present(address, &STREET_KEYS)),
        house_number: first_present(address, &["house_number"]),
        neighborhood: normalize_text(&first_present(address, &NEIGHBORHOOD_KEYS)),
        postal_code: Some(first_present(address, &["postcode"]))
            .filter(|postcode| is_cep(postcode))
            .unwrap_or_default(),
    }
}

/// Cliente de la API de búsqueda inversa de Nominatim
pub struct NominatimGeocoder {
    base_url: String,
    language: String,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Configuration(format!("cliente HTTP do geocoder: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            client,
        })
    }

    fn reverse_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/reverse?format=jsonv2&addressdetails=1&lat={}&lon={}&accept-language={}",
            self.base_url,
            latitude,
            longitude,
            urlencoding::encode(&self.language)
        )
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> GeocodeOutcome {
        let url = self.reverse_url(latitude, longitude);
        log::info!("🗺️ Geocodificação reversa: ({}, {})", latitude, longitude);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                log::warn!("⏱️ Geocoder excedeu o tempo limite para ({}, {})", latitude, longitude);
                return GeocodeOutcome::Timeout;
            }
            Err(e) => {
                log::warn!("❌ Geocoder indisponível: {}", e);
                return GeocodeOutcome::Unavailable(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::warn!("❌ Geocoder respondeu com status {}", status);
            return GeocodeOutcome::Unavailable(format!("status {}", status));
        }

        let body: NominatimReverseResponse = match response.json().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return GeocodeOutcome::Timeout,
            Err(e) => {
                log::warn!("❌ Resposta do geocoder ilegível: {}", e);
                return GeocodeOutcome::Unavailable(e.to_string());
            }
        };

        match body.address {
            Some(address) => {
                let extracted = extract_address(&address);
                log::info!(
                    "✅ Endereço encontrado: {} {} - {}",
                    extracted.street,
                    extracted.house_number,
                    extracted.neighborhood
                );
                GeocodeOutcome::Found(extracted)
            }
            None => {
                log::info!(
                    "⚠️ Nenhum endereço para ({}, {}): {}",
                    latitude,
                    longitude,
                    body.error.unwrap_or_default()
                );
                GeocodeOutcome::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn address(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_extract_full_address() {
        let extracted = extract_address(&address(json!({
            "road": "Rua X",
            "suburb": "Bairro Y",
            "house_number": "12",
            "postcode": "44000-000"
        })));
        assert_eq!(
            extracted,
            ExtractedAddress {
                street: "Rua X".into(),
                house_number: "12".into(),
                neighborhood: "Bairro Y".into(),
                postal_code: "44000-000".into(),
            }
        );
    }

    #[test]
    fn test_extract_normalizes_text() {
        let extracted = extract_address(&address(json!({
            "road": "  avenida getúlio vargas ",
            "neighbourhood": "CENTRO",
            "postcode": " 44001-000 "
        })));
        assert_eq!(extracted.street, "Avenida Getúlio Vargas");
        assert_eq!(extracted.neighborhood, "Centro");
        assert_eq!(extracted.postal_code, "44001-000");
        assert_eq!(extracted.house_number, "");
    }

    #[test]
    fn test_street_falls_back_through_synonyms() {
        let extracted = extract_address(&address(json!({ "street": "Travessa Z" })));
        assert_eq!(extracted.street, "Travessa Z");

        let extracted = extract_address(&address(json!({ "road": "", "pedestrian": "calçadão" })));
        assert_eq!(extracted.street, "Calçadão");

        let extracted = extract_address(&address(json!({ "city": "Feira de Santana" })));
        assert_eq!(extracted.street, "");
    }

    #[test]
    fn test_partial_postcode_is_left_blank() {
        let extracted = extract_address(&address(json!({ "road": "Rua X", "postcode": "44001" })));
        assert_eq!(extracted.street, "Rua X");
        assert_eq!(extracted.postal_code, "");
    }

    #[test]
    fn test_neighborhood_falls_back_to_quarter() {
        let extracted = extract_address(&address(json!({ "quarter": "tomba" })));
        assert_eq!(extracted.neighborhood, "Tomba");
    }

    #[test]
    fn test_reverse_url() {
        let geocoder = NominatimGeocoder::new(&GeocoderConfig {
            base_url: "http://localhost:8088/".into(),
            timeout: Duration::from_secs(5),
            user_agent: "test".into(),
            language: "pt-BR,en;q=0.5".into(),
        })
        .unwrap();
        let url = geocoder.reverse_url(-12.25, -38.95);
        assert!(url.starts_with("http://localhost:8088/reverse?format=jsonv2"));
        assert!(url.contains("lat=-12.25&lon=-38.95"));
        assert!(url.ends_with("accept-language=pt-BR%2Cen%3Bq%3D0.5"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_reported_not_raised() {
        let geocoder = NominatimGeocoder::new(&GeocoderConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_millis(500),
            user_agent: "test".into(),
            ..GeocoderConfig::default()
        })
        .unwrap();
        let outcome = geocoder.reverse(-12.25, -38.95).await;
        assert!(matches!(
            outcome,
            GeocodeOutcome::Unavailable(_) | GeocodeOutcome::Timeout
        ));
    }
}
