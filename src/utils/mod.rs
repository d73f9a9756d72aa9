//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y normalización de texto.

pub mod errors;
pub mod text;
pub mod validation;
