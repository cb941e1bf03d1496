//! Constructor de vistas de equipos
//!
//! Orquesta repositorios, reconciliador de odómetro y clasificador para
//! producir el registro por vehículo ordenado por prioridad, y las vistas
//! de detalle por matrícula.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::models::equipment::{
    CriticalFaultRow, EquipmentFaultRow, EquipmentFilter, EquipmentRecord, FaultTotals,
};
use crate::models::jobcard::{
    EquipmentHeader, FaultHistoryMetrics, FaultHistoryRow, FaultSummaryRow, HistoryMetrics,
    JobcardSummary, RecentFaultMetrics, RecentFaultRow,
};
use crate::models::maintenance::MaintenanceForecast;
use crate::models::reliability::{
    classify_critical_faults, classify_distance, classify_priority, classify_vintage, NumericField,
};
use crate::repositories::equipment_repository::EquipmentRepository;
use crate::repositories::jobcard_repository::JobcardRepository;
use crate::services::aggregation_service::{
    collapse_jobcards, fault_history, fault_summary, header_from_rows, history_metrics,
    recent_fault_breakdown, RECENT_JOBCARDS_WINDOW,
};
use crate::services::maintenance_service;
use crate::services::odometer_service::{self, OdometerLookup, ODOMETER_SOURCE_WARNING};
use crate::utils::errors::{not_found_error, AppResult};

/// Registro por vehículo ordenado por prioridad, con las advertencias de
/// degradación acumuladas durante el armado
#[derive(Debug, Serialize)]
pub struct EquipmentOverview {
    pub records: Vec<EquipmentRecord>,
    pub warnings: Vec<String>,
}

/// Historial colapsado de tarjetas de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleHistory {
    pub header: EquipmentHeader,
    pub jobcards: Vec<JobcardSummary>,
    pub metrics: HistoryMetrics,
}

/// Desglose de fallas recientes de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleRecentFaults {
    pub header: EquipmentHeader,
    pub faults: Vec<RecentFaultRow>,
    pub metrics: RecentFaultMetrics,
}

/// Tabla histórica completa de fallas de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleFaultHistory {
    pub header: EquipmentHeader,
    pub faults: Vec<FaultHistoryRow>,
    pub metrics: FaultHistoryMetrics,
}

/// Resumen por descripción de falla de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleFaultSummaryView {
    pub header: EquipmentHeader,
    pub faults: Vec<FaultSummaryRow>,
}

/// Pronóstico de mantenimiento de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleForecast {
    pub regnno: String,
    pub current_km: i64,
    pub forecast: MaintenanceForecast,
}

pub struct EquipmentService {
    equipment: EquipmentRepository,
    jobcards: JobcardRepository,
    odometer: Arc<OdometerLookup>,
}

impl EquipmentService {
    pub fn new(pool: PgPool, odometer: Arc<OdometerLookup>) -> Self {
        Self {
            equipment: EquipmentRepository::new(pool.clone()),
            jobcards: JobcardRepository::new(pool),
            odometer,
        }
    }

    /// Armar el registro por vehículo: filtros → año de emisión →
    /// odómetro reconciliado → conteos de fallas → señales → prioridad
    pub async fn overview(&self, filter: &EquipmentFilter) -> AppResult<EquipmentOverview> {
        let rows = self.equipment.find_equipment(filter).await?;
        info!("🚛 {} equipos encontrados para el filtro", rows.len());

        // El conteo total de fallas no se filtra; el crítico sí
        let fault_rows = self.equipment.fault_rows().await?;
        let critical_rows = self.equipment.critical_fault_rows(filter).await?;
        let totals = fault_totals(&fault_rows);
        let criticals = critical_counts(&critical_rows);

        let mut warnings = Vec::new();
        if !self.odometer.is_available() {
            warnings.push(ODOMETER_SOURCE_WARNING.to_string());
        }

        let mut records: Vec<EquipmentRecord> = rows
            .into_iter()
            .map(|row| {
                let inkm = odometer_service::reconcile(
                    row.inkm.as_deref(),
                    self.odometer.lookup(&row.regnno),
                );
                let (totalfaultcount, allfaults) = totals
                    .get(&row.eqptid)
                    .map(|t| (t.count, t.descriptions.clone()))
                    .unwrap_or((0, "-".to_string()));
                let totalcriticalfaultcount = criticals.get(&row.eqptid).copied().unwrap_or(0);

                let respect_to_vintage =
                    classify_vintage(NumericField::from_opt(row.issue_year()));
                let respect_to_distance = classify_distance(NumericField::Value(inkm));
                let respect_to_critical_faults =
                    classify_critical_faults(NumericField::Value(totalcriticalfaultcount));
                let priority = classify_priority(
                    respect_to_vintage,
                    respect_to_distance,
                    respect_to_critical_faults,
                );

                EquipmentRecord {
                    eqptid: row.eqptid,
                    regnno: row.regnno,
                    nomenclature: row.nomenclature,
                    dtofissue: row.dtofissue,
                    userunit_name: row.userunit_name,
                    inkm,
                    totalfaultcount,
                    allfaults,
                    totalcriticalfaultcount,
                    respect_to_vintage,
                    respect_to_distance,
                    respect_to_critical_faults,
                    priority,
                }
            })
            .collect();

        // Orden estable: P1 primero, matrícula preservada dentro del nivel
        records.sort_by_key(|r| r.priority.rank());

        Ok(EquipmentOverview { records, warnings })
    }

    /// Historial de tarjetas colapsado de un vehículo
    pub async fn jobcard_history(
        &self,
        regnno: &str,
        min_year: Option<i32>,
    ) -> AppResult<VehicleHistory> {
        let (header, collapsed) = self.collapsed_history(regnno, min_year).await?;
        let metrics = history_metrics(&collapsed);
        Ok(VehicleHistory {
            header,
            jobcards: collapsed,
            metrics,
        })
    }

    /// Desglose de fallas de las tarjetas más recientes
    pub async fn recent_faults(
        &self,
        regnno: &str,
        min_year: Option<i32>,
    ) -> AppResult<VehicleRecentFaults> {
        let (header, collapsed) = self.collapsed_history(regnno, min_year).await?;
        let (faults, metrics) = recent_fault_breakdown(&collapsed, RECENT_JOBCARDS_WINDOW);
        Ok(VehicleRecentFaults {
            header,
            faults,
            metrics,
        })
    }

    /// Tabla histórica completa: nunca aplica el filtro de año
    pub async fn fault_history(&self, regnno: &str) -> AppResult<VehicleFaultHistory> {
        let (header, collapsed) = self.collapsed_history(regnno, None).await?;
        let (faults, metrics) = fault_history(&collapsed);
        Ok(VehicleFaultHistory {
            header,
            faults,
            metrics,
        })
    }

    /// Resumen por descripción de falla
    pub async fn fault_summary(
        &self,
        regnno: &str,
        min_year: Option<i32>,
    ) -> AppResult<VehicleFaultSummaryView> {
        let (header, collapsed) = self.collapsed_history(regnno, min_year).await?;
        Ok(VehicleFaultSummaryView {
            faults: fault_summary(&collapsed),
            header,
        })
    }

    /// Pronóstico de mantenimiento sobre el odómetro reconciliado
    pub async fn maintenance_forecast(
        &self,
        regnno: &str,
        travel_km: Option<i64>,
    ) -> AppResult<VehicleForecast> {
        let equipment = self
            .equipment
            .find_by_regnno(regnno)
            .await?
            .ok_or_else(|| not_found_error("Equipment", regnno))?;

        let current_km = odometer_service::reconcile(
            equipment.inkm.as_deref(),
            self.odometer.lookup(&equipment.regnno),
        );

        Ok(VehicleForecast {
            regnno: equipment.regnno,
            current_km,
            forecast: maintenance_service::forecast(Some(current_km), travel_km),
        })
    }

    /// Filas del join por matrícula, colapsadas. Matrícula desconocida es
    /// NotFound; un vehículo sin tarjetas colapsa a un conjunto vacío.
    async fn collapsed_history(
        &self,
        regnno: &str,
        min_year: Option<i32>,
    ) -> AppResult<(EquipmentHeader, Vec<JobcardSummary>)> {
        let equipment = self
            .equipment
            .find_by_regnno(regnno)
            .await?
            .ok_or_else(|| not_found_error("Equipment", regnno))?;

        let rows = self.jobcards.history_rows(regnno, min_year).await?;
        let header = header_from_rows(&rows).unwrap_or(EquipmentHeader {
            regnno: equipment.regnno,
            nomenclature: equipment.nomenclature,
        });

        Ok((header, collapse_jobcards(&rows)))
    }
}

/// Agrupar las filas crudas (equipo, descripción) en conteo total y
/// descripciones distintas ordenadas, unidas con ", "
pub fn fault_totals(rows: &[EquipmentFaultRow]) -> HashMap<i32, FaultTotals> {
    let mut grouped: HashMap<i32, Vec<&str>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.eqptid)
            .or_default()
            .push(row.faultdescription.as_str());
    }

    grouped
        .into_iter()
        .map(|(eqptid, descriptions)| {
            let count = descriptions.len() as i64;
            let mut distinct: Vec<&str> = descriptions.into_iter().collect();
            distinct.sort_unstable();
            distinct.dedup();
            (
                eqptid,
                FaultTotals {
                    count,
                    descriptions: distinct.join(", "),
                },
            )
        })
        .collect()
}

/// Contar líneas de trabajo críticas por equipo
pub fn critical_counts(rows: &[CriticalFaultRow]) -> HashMap<i32, i64> {
    let mut counts: HashMap<i32, i64> = HashMap::new();
    for row in rows {
        *counts.entry(row.eqptid).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_totals_counts_and_dedups() {
        let rows = vec![
            EquipmentFaultRow {
                eqptid: 1,
                faultdescription: "Engine overheating".to_string(),
            },
            EquipmentFaultRow {
                eqptid: 1,
                faultdescription: "Engine overheating".to_string(),
            },
            EquipmentFaultRow {
                eqptid: 1,
                faultdescription: "Brake system failure".to_string(),
            },
            EquipmentFaultRow {
                eqptid: 2,
                faultdescription: "Suspension damage".to_string(),
            },
        ];

        let totals = fault_totals(&rows);
        let first = totals.get(&1).unwrap();
        // El conteo incluye repeticiones; las descripciones no
        assert_eq!(first.count, 3);
        assert_eq!(first.descriptions, "Brake system failure, Engine overheating");
        assert_eq!(totals.get(&2).unwrap().count, 1);
        assert!(totals.get(&3).is_none());
    }

    #[test]
    fn test_critical_counts() {
        let rows = vec![
            CriticalFaultRow { eqptid: 1 },
            CriticalFaultRow { eqptid: 1 },
            CriticalFaultRow { eqptid: 4 },
        ];
        let counts = critical_counts(&rows);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&4), Some(&1));
        assert_eq!(counts.get(&2), None);
    }
}
