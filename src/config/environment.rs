//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor, del geocoder y de
//! los caches. Todas las variables tienen valor por defecto.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Dónde se guardan las paradas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "STORE_BACKEND inválido: '{}' (use postgres ou memory)",
                other
            ))),
        }
    }
}

/// Configuración del servicio de geocodificación inversa
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Valor de `accept-language` enviado al geocoder
    pub language: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            timeout: Duration::from_secs(5),
            user_agent: "sipo_semob_fsa_v6".to_string(),
            language: "pt-BR".to_string(),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub store_backend: StoreBackend,
    pub list_cache_ttl: Duration,
    pub session_ttl: chrono::Duration,
    pub geocoder: GeocoderConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            store_backend: StoreBackend::Postgres,
            list_cache_ttl: Duration::from_secs(30),
            session_ttl: chrono::Duration::minutes(120),
            geocoder: GeocoderConfig::default(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> AppResult<Option<T>> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::Configuration(format!("{} inválido: '{}'", name, raw))),
        _ => Ok(None),
    }
}

impl EnvironmentConfig {
    /// Lee la configuración del entorno, con los defaults para lo que falte.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.store_backend,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        let geocoder = GeocoderConfig {
            base_url: env::var("NOMINATIM_URL").unwrap_or(defaults.geocoder.base_url),
            timeout: parse_var::<u64>("GEOCODER_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.geocoder.timeout),
            user_agent: env::var("GEOCODER_USER_AGENT").unwrap_or(defaults.geocoder.user_agent),
            language: env::var("GEOCODER_LANGUAGE").unwrap_or(defaults.geocoder.language),
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins,
            store_backend,
            list_cache_ttl: parse_var::<u64>("LIST_CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.list_cache_ttl),
            session_ttl: parse_var::<i64>("SESSION_TTL_MINUTES")?
                .map(chrono::Duration::minutes)
                .unwrap_or(defaults.session_ttl),
            geocoder,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("PostgreSQL".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert!(matches!(
            "sqlite".parse::<StoreBackend>(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.list_cache_ttl, Duration::from_secs(30));
        assert_eq!(config.geocoder.timeout, Duration::from_secs(5));
        assert_eq!(config.geocoder.language, "pt-BR");
        assert!(config.is_development());
    }
}
