//! Modelos de tarjetas de trabajo
//!
//! Filas crudas del join de 6 tablas (equipo → tarjeta → detalle → falla,
//! y tarjeta → emisión de repuesto → stock) y las vistas colapsadas que
//! produce el agregador.

use chrono::NaiveDate;
use serde::Serialize;

/// Fila cruda del join con fan-out: una tarjeta con 3 fallas y 2 emisiones
/// de repuesto produce 6 filas.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobcardJoinRow {
    pub regnno: Option<String>,
    pub nomenclature: Option<String>,
    pub jobcardno: Option<String>,
    pub jobcarddate: Option<NaiveDate>,
    pub faults: Option<String>,
    pub itemname: Option<String>,
    pub issues: Option<i64>,
}

/// Cabecera mostrada de un vehículo (política primera-fila-gana)
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentHeader {
    pub regnno: String,
    pub nomenclature: Option<String>,
}

/// Una fila por tarjeta de trabajo, independiente del ancho del fan-out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobcardSummary {
    pub jobcardno: String,
    pub jobcarddate: NaiveDate,
    pub faults: String,
    pub spares: String,
    /// Suma de cantidades emitidas, o None si no hubo filas de emisión
    pub issues: Option<i64>,
}

/// Métricas del historial completo de tarjetas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryMetrics {
    pub total_jobcards: usize,
    pub unique_faults: usize,
    pub unique_spares: usize,
}

/// Fila del desglose de fallas recientes (ventana de N tarjetas)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentFaultRow {
    pub fault_description: String,
    pub fault_count: i64,
    pub spares: String,
    pub last_occurrence: NaiveDate,
}

/// Métricas acompañantes del desglose reciente
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentFaultMetrics {
    pub recent_unique_faults: usize,
    pub recent_fault_occurrences: i64,
    pub most_recent_fault_count: Option<i64>,
}

/// Fila de la tabla histórica completa de fallas
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultHistoryRow {
    pub fault_description: String,
    pub count: i64,
}

/// Métricas de la tabla histórica completa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultHistoryMetrics {
    pub unique_faults: usize,
    pub total_occurrences: i64,
    pub highest_count: Option<i64>,
}

/// Fila del resumen por descripción de falla
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultSummaryRow {
    pub fault_description: String,
    pub fault_count: i64,
    pub spares: String,
}
