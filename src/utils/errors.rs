//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del inventario de paradas
//! y su conversión a respuestas HTTP apropiadas. Todos los mensajes
//! llegan al usuario final como texto libre.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Código SQLSTATE de PostgreSQL para violación de unicidad
const UNIQUE_VIOLATION: &str = "23505";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
}

impl AppError {
    /// Mensaje legible para el usuario final
    pub fn user_message(&self) -> String {
        match self {
            AppError::Configuration(msg) => format!("⚠️ Configuração inválida: {}", msg),
            AppError::Database(_) => {
                "Erro ao acessar o banco de dados. Tente novamente.".to_string()
            }
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal(_) => "Ocorreu um erro inesperado.".to_string(),
        }
    }

    fn status_and_label(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Configuration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration Error"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database Error"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, label) = self.status_and_label();

        if status.is_server_error() {
            log::error!("❌ {}", self);
        } else {
            log::warn!("⚠️ {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: label.to_string(),
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Convierte un error de escritura en conflicto cuando viola la unicidad
/// del número de parada; el resto queda como error de base de datos.
pub fn map_write_error(error: sqlx::Error, external_code: Option<&str>) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return duplicate_code_error(external_code.unwrap_or_default());
        }
    }
    AppError::Database(error)
}

/// Función helper para el conflicto de número de parada repetido
pub fn duplicate_code_error(code: &str) -> AppError {
    AppError::Conflict(format!("Já existe uma parada com o número '{}'", code))
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(id: i32) -> AppError {
    AppError::NotFound(format!("Parada {} não encontrada", id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
