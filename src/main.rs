use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use sip_paradas::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use sip_paradas::create_app;
use sip_paradas::database;
use sip_paradas::repositories::{MemoryStopRepository, PgStopRepository, StopStore};
use sip_paradas::services::{NominatimGeocoder, ReverseGeocoder};
use sip_paradas::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|value| value.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚏 SIP Paradas - Cadastro de pontos de ônibus");
    info!("=============================================");

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Error de configuración: {}", e);
            return Err(anyhow::anyhow!("Error de configuración: {}", e));
        }
    };

    let store: Arc<dyn StopStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let secrets_file = std::env::var("SECRETS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".secrets"));

            let db_config = DatabaseConfig::resolve(&secrets_file).map_err(|e| {
                error!("❌ {}", e);
                anyhow::anyhow!("Error de base de datos: {}", e)
            })?;
            let pool = database::connect(&db_config).await.map_err(|e| {
                error!("❌ Error conectando a la base de datos: {}", e);
                anyhow::anyhow!("Error de base de datos: {}", e)
            })?;
            Arc::new(PgStopRepository::new(pool))
        }
        StoreBackend::Memory => {
            info!("🧪 Usando almacenamiento en memoria (los datos no persisten)");
            Arc::new(MemoryStopRepository::new())
        }
    };

    let geocoder: Arc<dyn ReverseGeocoder> = Arc::new(
        NominatimGeocoder::new(&config.geocoder)
            .map_err(|e| anyhow::anyhow!("Error creando geocodificador: {}", e))?,
    );

    let addr = config.server_url();
    let app_state = AppState::new(config, store, geocoder);
    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚏 Paradas:");
    info!("   POST /api/paradas - Cadastrar parada");
    info!("   GET  /api/paradas - Listar (filtros ?bairros=&rua=)");
    info!("   GET  /api/paradas/options - Opciones del formulario");
    info!("   GET  /api/paradas/bairros - Bairros cadastrados");
    info!("   GET  /api/paradas/selecao - Lista para selección");
    info!("   GET  /api/paradas/mapa - Marcadores del mapa");
    info!("   GET  /api/paradas/:id - Obtener parada");
    info!("   PUT  /api/paradas/:id - Editar parada");
    info!("   DELETE /api/paradas/:id?confirmar=true - Excluir parada");
    info!("📊 GET  /api/dashboard - Indicadores");
    info!("📍 Sesiones de captura:");
    info!("   POST /api/sessoes - Abrir sesión");
    info!("   GET  /api/sessoes/:id - Estado de la sesión");
    info!("   POST /api/sessoes/:id/gps - Ubicación GPS");
    info!("   POST /api/sessoes/:id/mapa - Clic en el mapa");
    info!("   POST /api/sessoes/:id/cadastro - Enviar formulario");
    info!("   DELETE /api/sessoes/:id - Cerrar sesión");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
