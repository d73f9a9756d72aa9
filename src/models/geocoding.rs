//! Modelos de geocodificación inversa

use serde::Serialize;

/// Dirección extraída de la respuesta del geocoder, ya normalizada.
/// Un campo que el servicio no devolvió queda como "".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedAddress {
    pub street: String,
    pub house_number: String,
    pub neighborhood: String,
    pub postal_code: String,
}

/// Resultado de una búsqueda inversa
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum GeocodeOutcome {
    Found(ExtractedAddress),
    NotFound,
    Unavailable(String),
    Timeout,
}

impl GeocodeOutcome {
    /// Aviso para el usuario cuando la dirección no se pudo completar.
    pub fn warning(&self) -> Option<String> {
        match self {
            GeocodeOutcome::Found(_) => None,
            GeocodeOutcome::NotFound => {
                Some("Endereço não encontrado para este ponto. Preencha manualmente.".to_string())
            }
            GeocodeOutcome::Unavailable(_) => {
                Some("Serviço de endereços indisponível. Preencha manualmente.".to_string())
            }
            GeocodeOutcome::Timeout => {
                Some("A busca de endereço demorou demais. Preencha manualmente.".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(GeocodeOutcome::Timeout).unwrap();
        assert_eq!(json["status"], "timeout");

        let json = serde_json::to_value(GeocodeOutcome::Found(ExtractedAddress {
            street: "Rua X".into(),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["detail"]["street"], "Rua X");
    }

    #[test]
    fn test_only_found_has_no_warning() {
        assert!(GeocodeOutcome::Found(ExtractedAddress::default()).warning().is_none());
        assert!(GeocodeOutcome::Unavailable("dns".into()).warning().is_some());
    }
}
