//! Configuración de base de datos
//!
//! Este módulo resuelve la URL de conexión (archivo de secretos o
//! variable de entorno) y crea el pool de PostgreSQL con SQLx.

use std::path::Path;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::utils::errors::{AppError, AppResult};

const LEGACY_SCHEME: &str = "postgres://";
const CANONICAL_SCHEME: &str = "postgresql://";

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

/// Reescribe el esquema legado `postgres://` al canónico `postgresql://`.
pub fn normalize_database_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with(LEGACY_SCHEME) {
        url.replacen(LEGACY_SCHEME, CANONICAL_SCHEME, 1)
    } else {
        url.to_string()
    }
}

/// Busca DATABASE_URL en un archivo de secretos con formato dotenv.
fn database_url_from_secrets(path: &Path) -> AppResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let entries = dotenvy::from_path_iter(path).map_err(|e| {
        AppError::Configuration(format!("arquivo de segredos {}: {}", path.display(), e))
    })?;

    for entry in entries {
        let (key, value) = entry.map_err(|e| {
            AppError::Configuration(format!("arquivo de segredos {}: {}", path.display(), e))
        })?;
        if key == "DATABASE_URL" && !value.trim().is_empty() {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

impl DatabaseConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            url: normalize_database_url(url),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    /// Resuelve la URL: primero el archivo de secretos, después el entorno.
    pub fn resolve(secrets_file: &Path) -> AppResult<Self> {
        let url = match database_url_from_secrets(secrets_file)? {
            Some(url) => {
                log::info!("🔐 DATABASE_URL lida de {}", secrets_file.display());
                url
            }
            None => std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| {
                    AppError::Configuration("URL do banco não configurada.".to_string())
                })?,
        };

        Ok(Self::with_url(&url))
    }

    /// Crear un nuevo pool de conexiones; cada checkout verifica la conexión
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .test_before_acquire(true)
            .connect(&self.url)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_database_url() {
        assert_eq!(
            normalize_database_url("postgres://u:p@host/db"),
            "postgresql://u:p@host/db"
        );
        assert_eq!(
            normalize_database_url("postgresql://u:p@host/db"),
            "postgresql://u:p@host/db"
        );
        assert_eq!(
            normalize_database_url(" postgres://u:p@host/postgres:// "),
            "postgresql://u:p@host/postgres://"
        );
    }

    #[test]
    fn test_secrets_file_is_read() {
        let path = std::env::temp_dir().join(format!("paradas-secrets-{}", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "OTHER=1").unwrap();
        writeln!(file, "DATABASE_URL=postgres://u:p@localhost/paradas").unwrap();

        let config = DatabaseConfig::resolve(&path).unwrap();
        assert_eq!(config.url, "postgresql://u:p@localhost/paradas");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_secrets_file_is_not_an_error() {
        let path = std::env::temp_dir().join("paradas-secrets-does-not-exist");
        assert_eq!(database_url_from_secrets(&path).unwrap(), None);
    }
}
