//! Middleware del sistema
//!
//! Por ahora solo CORS; el tracing de requests se agrega en `create_app`.

pub mod cors;

pub use cors::*;
