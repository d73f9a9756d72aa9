//! Conexión a PostgreSQL
//!
//! Creación del pool y de la tabla `paradas` si todavía no existe.

use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::utils::errors::AppResult;

const CREATE_PARADAS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS paradas (
    id                 SERIAL PRIMARY KEY,
    numero_parada      VARCHAR(50) UNIQUE,
    rua                VARCHAR(255) NOT NULL,
    numero_localizacao VARCHAR(20),
    bairro             VARCHAR(100) NOT NULL,
    cep                VARCHAR(10),
    ponto_referencia   TEXT NOT NULL,
    sentido            VARCHAR(20) NOT NULL,
    tipo               VARCHAR(50) NOT NULL,
    latitude           NUMERIC(10, 8) NOT NULL,
    longitude          NUMERIC(11, 8) NOT NULL,
    foto_url           TEXT,
    data_cadastro      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Conecta y deja el esquema listo
pub async fn connect(config: &DatabaseConfig) -> AppResult<PgPool> {
    log::info!("🐘 Conectando a {}", mask_database_url(&config.url));
    let pool = config.create_pool().await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Crea la tabla `paradas` si no existe
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_PARADAS_TABLE).execute(pool).await?;
    log::info!("✅ Tabela paradas pronta");
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
