use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;
use serde_json::json;

use transport_rental::api;
use transport_rental::config::environment::EnvironmentConfig;
use transport_rental::database;
use transport_rental::middleware::cors::cors_middleware;
use transport_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let env_config = EnvironmentConfig::default();

    // Configurar logging
    let level = if env_config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🛴 Transport Rental - API de renta de transportes");
    info!("=================================================");

    // Inicializar base de datos
    let pool = match database::connection::create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = database::connection::run_migrations(&pool).await {
        error!("❌ Error ejecutando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Migraciones aplicadas");

    // Crear router de la API
    let app_state = AppState::new(pool, env_config.clone());

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .merge(api::create_api_router(app_state.clone()))
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = env_config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("👤 Endpoints - Account:");
    info!("   POST /api/account/sign-up - Registro");
    info!("   POST /api/account/sign-in - Sign-in");
    info!("   POST /api/account/sign-in/refresh - Rotar refresh token");
    info!("   POST /api/account/sign-out - Sign-out");
    info!("   GET  /api/account/me - Cuenta propia");
    info!("   PUT  /api/account/update - Actualizar cuenta propia");
    info!("🚗 Endpoints - Transport:");
    info!("   GET  /api/transport/:id - Obtener transporte");
    info!("   GET  /api/transport - Listar transportes propios");
    info!("   POST /api/transport - Crear transporte");
    info!("   PUT  /api/transport/:id - Actualizar transporte");
    info!("   DELETE /api/transport/:id - Eliminar transporte");
    info!("🔑 Endpoints - Rent:");
    info!("   GET  /api/rent/transport - Búsqueda por proximidad");
    info!("   GET  /api/rent/:id - Obtener renta");
    info!("   GET  /api/rent/my-history - Historial propio");
    info!("   GET  /api/rent/transport-history/:id - Historial de transporte");
    info!("   POST /api/rent/new/:id - Iniciar renta");
    info!("   POST /api/rent/end/:id - Terminar renta");
    info!("💰 Endpoints - Payment:");
    info!("   POST /api/payment/top-up/:id - Abonar saldo");
    info!("🛡️ Endpoints - Admin:");
    info!("   /api/admin/account - CRUD de cuentas");
    info!("   /api/admin/transport - CRUD de transportes");
    info!("   /api/admin/rent - CRUD y cierre de rentas");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "¡API de renta de transportes funcionando correctamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
