//! Modelos de recomendación de repuestos para trayecto
//!
//! Filas crudas de patrones de falla y correlación falla↔repuesto,
//! y la salida clasificada del recomendador.

use serde::Serialize;
use std::fmt;

/// Fila cruda: frecuencia de una falla en un vehículo seleccionado
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FaultPatternRow {
    pub eqptid: i32,
    pub regnno: String,
    pub nomenclature: Option<String>,
    pub faults: String,
    pub fault_frequency: i64,
}

/// Fila cruda: frecuencia de uso de un repuesto para una falla
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SpareCorrelationRow {
    pub faults: String,
    pub spare_part: String,
    pub usage_frequency: i64,
}

/// Resumen de fallas por vehículo seleccionado
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleFaultSummary {
    pub eqptid: i32,
    pub regnno: String,
    pub nomenclature: Option<String>,
    pub total_fault_occurrences: i64,
    pub unique_faults: i64,
}

/// Falla agregada sobre toda la selección
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopFaultRow {
    pub faults: String,
    pub total_frequency: i64,
}

/// Nivel de recomendación de un repuesto clasificado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendationLevel {
    Critical,
    Important,
    Optional,
}

impl fmt::Display for RecommendationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecommendationLevel::Critical => "Critical",
            RecommendationLevel::Important => "Important",
            RecommendationLevel::Optional => "Optional",
        };
        write!(f, "{}", label)
    }
}

/// Repuesto clasificado por frecuencia de uso (dense rank, 1-based)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSpare {
    pub spare_part: String,
    pub usage_frequency: i64,
    pub priority_rank: i64,
    pub recommendation: RecommendationLevel,
}

/// Fila aplanada (vehículo × falla × repuesto) para exportación
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub registration_no: String,
    pub equipment_type: Option<String>,
    pub fault: String,
    pub fault_frequency: i64,
    pub spare_part: String,
    pub part_usage_frequency: i64,
}

/// Recomendación completa para el trayecto
#[derive(Debug, Clone, Serialize)]
pub struct JourneyRecommendation {
    pub vehicle_summaries: Vec<VehicleFaultSummary>,
    pub top_faults: Vec<TopFaultRow>,
    pub spare_parts: Vec<RankedSpare>,
    pub critical_parts: usize,
    pub important_parts: usize,
    pub report: Vec<ReportRow>,
}

/// Resultado del pipeline: los casos degenerados son estados, no errores
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JourneyOutcome {
    NoVehiclesSelected,
    NoFaultData,
    NoSpareData,
    Recommendations(JourneyRecommendation),
}
