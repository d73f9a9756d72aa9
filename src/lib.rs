//! SIP Paradas - cadastro de paradas de ônibus
//!
//! Este crate expone el router completo de la API para que el binario y
//! los tests de integración lo construyan de la misma forma.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_for;
use crate::state::AppState;

/// Construye el router con todas las rutas y las capas comunes
/// (tracing de requests, compresión y CORS).
pub fn create_app(state: AppState) -> Router {
    let cors = cors_for(state.config.is_development(), &state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/paradas", routes::stop_routes::create_stop_router())
        .nest(
            "/api/dashboard",
            routes::dashboard_routes::create_dashboard_router(),
        )
        .nest("/api/sessoes", routes::session_routes::create_session_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "sip_paradas",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
