mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use services::odometer_service::OdometerLookup;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚛 Fleet Maintenance Analytics - API");
    info!("====================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Cargar el odómetro suplementario (su ausencia es un modo degradado
    // documentado, no una falla de arranque)
    let odometer = Arc::new(OdometerLookup::load(&config.odometer_file));
    if !odometer.is_available() {
        info!("⚠️ Odómetro suplementario no disponible: se usan solo los valores del store");
    }

    // CORS: permisivo en desarrollo, orígenes explícitos en producción
    let cors = if config.is_production() && !config.cors_origins.is_empty() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone(), odometer);

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/equipment", routes::equipment_routes::create_equipment_router())
        .nest("/api/filters", routes::equipment_routes::create_filter_router())
        .nest("/api/journey", routes::journey_routes::create_journey_router())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚛 Endpoints - Equipment:");
    info!("   GET  /api/equipment - Listado clasificado por prioridad");
    info!("   GET  /api/equipment/:regnno/history - Historial de tarjetas");
    info!("   GET  /api/equipment/:regnno/recent-faults - Fallas recientes");
    info!("   GET  /api/equipment/:regnno/fault-history - Histórico de fallas");
    info!("   GET  /api/equipment/:regnno/fault-summary - Resumen por falla");
    info!("   GET  /api/equipment/:regnno/maintenance-forecast - Pronóstico");
    info!("🔧 Endpoints - Journey:");
    info!("   POST /api/journey/recommendations - Recomendación de repuestos");
    info!("📋 Endpoints - Filters:");
    info!("   GET  /api/filters/subcategories - Subcategorías");
    info!("   GET  /api/filters/user-units - Unidades usuarias");

    // Iniciar servidor
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-maintenance",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
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
