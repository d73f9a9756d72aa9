//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos: la parada (tabla `paradas`),
//! la sesión de captura, la geocodificación y los reportes.

pub mod geocoding;
pub mod report;
pub mod session;
pub mod stop;

pub use stop::{Direction, FixtureType, Stop, StopDraft};
