use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::{Direction, FixtureType, Stop, StopDraft};
use crate::utils::errors::{map_write_error, not_found_error, AppError, AppResult};

/// Operaciones del almacén de paradas.
///
/// Toda escritura es atómica: si falla, no queda nada a medias.
#[async_trait]
pub trait StopStore: Send + Sync {
    async fn create(&self, draft: StopDraft) -> AppResult<Stop>;

    /// Todas las paradas, las más recientes primero.
    async fn list_all(&self) -> AppResult<Vec<Stop>>;

    async fn get(&self, id: i32) -> AppResult<Option<Stop>>;

    async fn update(&self, id: i32, draft: StopDraft) -> AppResult<Stop>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

// Fila tal como está en la tabla `paradas`. Tablas antiguas admiten NULL
// en casi todas las columnas, por eso todo llega como `Option`.
#[derive(Debug, Default, sqlx::FromRow)]
struct StopRow {
    id: i32,
    numero_parada: Option<String>,
    rua: Option<String>,
    numero_localizacao: Option<String>,
    bairro: Option<String>,
    cep: Option<String>,
    ponto_referencia: Option<String>,
    sentido: Option<String>,
    tipo: Option<String>,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
    foto_url: Option<String>,
    data_cadastro: Option<DateTime<Utc>>,
}

fn required<T>(value: Option<T>, id: i32, column: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::Internal(format!("parada {} sem valor em {}", id, column)))
}

impl TryFrom<StopRow> for Stop {
    type Error = AppError;

    fn try_from(row: StopRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let direction: Direction = required(row.sentido, id, "sentido")?.parse().map_err(|e| {
            AppError::Internal(format!("parada {} com sentido desconhecido: {}", id, e))
        })?;
        let fixture_type: FixtureType = required(row.tipo, id, "tipo")?.parse().map_err(|e| {
            AppError::Internal(format!("parada {} com tipo desconhecido: {}", id, e))
        })?;

        Ok(Stop {
            id,
            external_code: row.numero_parada,
            street: required(row.rua, id, "rua")?,
            street_number: row.numero_localizacao,
            neighborhood: required(row.bairro, id, "bairro")?,
            postal_code: row.cep,
            reference: row.ponto_referencia.unwrap_or_default(),
            direction,
            fixture_type,
            latitude: required(row.latitude, id, "latitude")?,
            longitude: required(row.longitude, id, "longitude")?,
            photo_name: row.foto_url,
            created_at: required(row.data_cadastro, id, "data_cadastro")?,
        })
    }
}

/// Convierte las filas de una lectura completa. Una fila que no se puede
/// interpretar se registra y se omite para no tumbar la lista entera.
fn decode_rows(rows: Vec<StopRow>) -> Vec<Stop> {
    rows.into_iter()
        .filter_map(|row| match Stop::try_from(row) {
            Ok(stop) => Some(stop),
            Err(e) => {
                log::warn!("⚠️ Registro ignorado na listagem: {}", e);
                None
            }
        })
        .collect()
}

// `data_cadastro` puede ser TIMESTAMP sin zona en tablas antiguas
const STOP_COLUMNS: &str = "id, numero_parada, rua, numero_localizacao, bairro, cep, \
     ponto_referencia, sentido, tipo, latitude, longitude, foto_url, \
     data_cadastro::timestamptz AS data_cadastro";

pub struct PgStopRepository {
    pool: PgPool,
}

impl PgStopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StopStore for PgStopRepository {
    async fn create(&self, draft: StopDraft) -> AppResult<Stop> {
        let code = draft.external_code.clone();
        let query = format!(
            r#"
            INSERT INTO paradas (numero_parada, rua, numero_localizacao, bairro, cep, ponto_referencia,
                                 sentido, tipo, latitude, longitude, foto_url, data_cadastro)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            STOP_COLUMNS
        );

        // Si algo falla, el drop de `tx` hace rollback
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, StopRow>(&query)
            .bind(draft.external_code)
            .bind(draft.street)
            .bind(draft.street_number)
            .bind(draft.neighborhood)
            .bind(draft.postal_code)
            .bind(draft.reference)
            .bind(draft.direction.as_str())
            .bind(draft.fixture_type.as_str())
            .bind(draft.latitude)
            .bind(draft.longitude)
            .bind(draft.photo_name)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, code.as_deref()))?;
        tx.commit().await?;

        log::info!("💾 Parada {} cadastrada", row.id);
        Stop::try_from(row)
    }

    async fn list_all(&self) -> AppResult<Vec<Stop>> {
        let query = format!(
            "SELECT {} FROM paradas ORDER BY data_cadastro DESC, id DESC",
            STOP_COLUMNS
        );
        let rows = sqlx::query_as::<_, StopRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(decode_rows(rows))
    }

    async fn get(&self, id: i32) -> AppResult<Option<Stop>> {
        let query = format!("SELECT {} FROM paradas WHERE id = $1", STOP_COLUMNS);
        let row = sqlx::query_as::<_, StopRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Stop::try_from).transpose()
    }

    async fn update(&self, id: i32, draft: StopDraft) -> AppResult<Stop> {
        let code = draft.external_code.clone();
        let query = format!(
            r#"
            UPDATE paradas
            SET numero_parada = $2, rua = $3, numero_localizacao = $4, bairro = $5, cep = $6,
                ponto_referencia = $7, sentido = $8, tipo = $9, latitude = $10, longitude = $11,
                foto_url = $12
            WHERE id = $1
            RETURNING {}
            "#,
            STOP_COLUMNS
        );

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, StopRow>(&query)
            .bind(id)
            .bind(draft.external_code)
            .bind(draft.street)
            .bind(draft.street_number)
            .bind(draft.neighborhood)
            .bind(draft.postal_code)
            .bind(draft.reference)
            .bind(draft.direction.as_str())
            .bind(draft.fixture_type.as_str())
            .bind(draft.latitude)
            .bind(draft.longitude)
            .bind(draft.photo_name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, code.as_deref()))?
            .ok_or_else(|| not_found_error(id))?;
        tx.commit().await?;

        log::info!("✏️ Parada {} atualizada", id);
        Stop::try_from(row)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM paradas WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error(id));
        }
        tx.commit().await?;

        log::info!("🗑️ Parada {} excluída", id);
        Ok(())
    }
}
