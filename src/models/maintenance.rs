//! Modelos de pronóstico de mantenimiento
//!
//! Tabla fija de intervalos de servicio y el resultado del pronóstico.

use lazy_static::lazy_static;
use serde::Serialize;

lazy_static! {
    /// Tareas de servicio por intervalo de kilometraje
    pub static ref SERVICE_INTERVALS: Vec<(i64, Vec<&'static str>)> = vec![
        (
            5_000,
            vec![
                "Change engine oil and oil filter",
                "Replace fuel filter",
                "Inspect and adjust brakes",
            ],
        ),
        (
            10_000,
            vec![
                "Check gearbox and differential oil",
                "Inspect and adjust clutch",
                "Inspect suspension system",
            ],
        ),
        (
            20_000,
            vec!["Engine tune-up", "Clean fuel tank and lines"],
        ),
    ];
}

/// Un intervalo de servicio que vence dentro del recorrido planeado
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceStep {
    pub interval_km: i64,
    pub km_remaining: i64,
    pub due_at_km: i64,
    pub tasks: Vec<String>,
}

/// Resultado del pronóstico de mantenimiento
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MaintenanceForecast {
    /// Falta el odómetro actual o la distancia a recorrer
    InsufficientData,
    NothingDue { travel_km: i64 },
    Due {
        current_km: i64,
        travel_km: i64,
        steps: Vec<MaintenanceStep>,
    },
}
