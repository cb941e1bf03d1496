//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: el pool de conexiones, la configuración
//! y el mapa de odómetro suplementario cargado al arranque.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::odometer_service::OdometerLookup;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub odometer: Arc<OdometerLookup>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, odometer: Arc<OdometerLookup>) -> Self {
        Self {
            pool,
            config,
            odometer,
        }
    }
}
