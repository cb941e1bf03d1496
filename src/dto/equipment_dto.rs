//! DTOs de equipos
//!
//! Parámetros de consulta del listado y las vistas de detalle, y la
//! envoltura genérica de respuestas de la API.

use serde::{Deserialize, Serialize};

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

/// Filtros del listado de equipos
#[derive(Debug, Default, Deserialize)]
pub struct EquipmentListQuery {
    pub subcat_id: Option<i32>,
    pub user_unit_id: Option<i32>,
    pub min_year: Option<i32>,
}

/// Filtro de año de las vistas de detalle
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub min_year: Option<i32>,
}

/// Distancia planeada del pronóstico de mantenimiento
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub travel_km: Option<i64>,
}
