//! Services module
//!
//! Este módulo contiene la lógica de negocio: captura de ubicación con
//! geocodificación inversa, cache de la lista y reportes.

pub mod capture_session_service;
pub mod geocoding_service;
pub mod report_service;
pub mod stop_list_cache;

pub use capture_session_service::CaptureSessionService;
pub use geocoding_service::{NominatimGeocoder, ReverseGeocoder};
pub use stop_list_cache::StopListCache;
