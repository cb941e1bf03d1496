//! Recomendador de repuestos para trayecto
//!
//! Pipeline de tres pasos sobre los vehículos seleccionados: patrones de
//! falla, correlación falla↔repuesto y clasificación por rango denso.
//! Los casos degenerados (selección vacía, sin fallas, sin repuestos) son
//! estados del resultado, no errores.

use std::collections::BTreeMap;

use sqlx::PgPool;
use tracing::info;

use crate::models::recommendation::{
    FaultPatternRow, JourneyOutcome, JourneyRecommendation, RankedSpare, RecommendationLevel,
    ReportRow, SpareCorrelationRow, TopFaultRow, VehicleFaultSummary,
};
use crate::repositories::spares_repository::SparesRepository;
use crate::utils::errors::AppResult;

pub struct RecommendationService {
    repository: SparesRepository,
}

impl RecommendationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SparesRepository::new(pool),
        }
    }

    /// Ejecutar el pipeline completo para los vehículos seleccionados
    pub async fn recommend(&self, equipment_ids: &[i32]) -> AppResult<JourneyOutcome> {
        if equipment_ids.is_empty() {
            return Ok(JourneyOutcome::NoVehiclesSelected);
        }

        info!("🔧 Analizando {} vehículos seleccionados", equipment_ids.len());

        // Paso 1: patrones de falla por vehículo
        let patterns = self.repository.fault_patterns(equipment_ids).await?;
        if patterns.is_empty() {
            return Ok(JourneyOutcome::NoFaultData);
        }

        // Paso 2: correlación repuesto↔falla para las descripciones halladas
        let fault_names = distinct_faults(&patterns);
        let correlations = self.repository.spare_correlations(&fault_names).await?;
        if correlations.is_empty() {
            return Ok(JourneyOutcome::NoSpareData);
        }

        // Paso 3: clasificación y armado del reporte
        let vehicle_summaries = summarize_vehicles(&patterns);
        let top_faults = top_faults(&patterns, 10);
        let spare_parts = rank_spares(&correlations);
        let critical_parts = spare_parts
            .iter()
            .filter(|s| s.recommendation == RecommendationLevel::Critical)
            .count();
        let important_parts = spare_parts
            .iter()
            .filter(|s| s.recommendation == RecommendationLevel::Important)
            .count();
        let report = build_report(&vehicle_summaries, &patterns, &correlations);

        info!(
            "📊 Recomendación lista: {} repuestos ({} críticos, {} importantes)",
            spare_parts.len(),
            critical_parts,
            important_parts
        );

        Ok(JourneyOutcome::Recommendations(JourneyRecommendation {
            vehicle_summaries,
            top_faults,
            spare_parts,
            critical_parts,
            important_parts,
            report,
        }))
    }
}

/// Descripciones de falla distintas, en orden de primera aparición
pub fn distinct_faults(patterns: &[FaultPatternRow]) -> Vec<String> {
    let mut faults: Vec<String> = Vec::new();
    for pattern in patterns {
        if !faults.contains(&pattern.faults) {
            faults.push(pattern.faults.clone());
        }
    }
    faults
}

/// Resumen por vehículo: ocurrencias totales y fallas únicas.
/// Conserva el orden por matrícula de la consulta de patrones.
pub fn summarize_vehicles(patterns: &[FaultPatternRow]) -> Vec<VehicleFaultSummary> {
    let mut summaries: Vec<VehicleFaultSummary> = Vec::new();
    for pattern in patterns {
        match summaries.iter_mut().find(|s| s.eqptid == pattern.eqptid) {
            Some(summary) => {
                summary.total_fault_occurrences += pattern.fault_frequency;
                summary.unique_faults += 1;
            }
            None => summaries.push(VehicleFaultSummary {
                eqptid: pattern.eqptid,
                regnno: pattern.regnno.clone(),
                nomenclature: pattern.nomenclature.clone(),
                total_fault_occurrences: pattern.fault_frequency,
                unique_faults: 1,
            }),
        }
    }
    summaries
}

/// Fallas más comunes sobre toda la selección, acotadas a `limit`
pub fn top_faults(patterns: &[FaultPatternRow], limit: usize) -> Vec<TopFaultRow> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for pattern in patterns {
        *totals.entry(pattern.faults.as_str()).or_default() += pattern.fault_frequency;
    }

    let mut rows: Vec<TopFaultRow> = totals
        .into_iter()
        .map(|(faults, total_frequency)| TopFaultRow {
            faults: faults.to_string(),
            total_frequency,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_frequency
            .cmp(&a.total_frequency)
            .then_with(|| a.faults.cmp(&b.faults))
    });
    rows.truncate(limit);
    rows
}

/// Clasificar repuestos por frecuencia agregada con rango denso (los
/// empates comparten rango, sin huecos) y asignar nivel por umbrales
/// calculados sobre el conteo de rangos DISTINTOS: top 20% (mínimo 1)
/// crítico, top 50% (mínimo 2) importante, resto opcional.
pub fn rank_spares(correlations: &[SpareCorrelationRow]) -> Vec<RankedSpare> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for row in correlations {
        *totals.entry(row.spare_part.as_str()).or_default() += row.usage_frequency;
    }

    let mut parts: Vec<(&str, i64)> = totals.into_iter().collect();
    parts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    // Rango denso 1-based sobre frecuencias distintas
    let mut ranked: Vec<(String, i64, i64)> = Vec::with_capacity(parts.len());
    let mut rank = 0_i64;
    let mut previous: Option<i64> = None;
    for (name, frequency) in parts {
        if previous != Some(frequency) {
            rank += 1;
            previous = Some(frequency);
        }
        ranked.push((name.to_string(), frequency, rank));
    }

    let distinct_ranks = rank;
    let critical_cutoff = (distinct_ranks as f64 * 0.2).max(1.0);
    let important_cutoff = (distinct_ranks as f64 * 0.5).max(2.0);

    ranked
        .into_iter()
        .map(|(spare_part, usage_frequency, priority_rank)| {
            let recommendation = if priority_rank as f64 <= critical_cutoff {
                RecommendationLevel::Critical
            } else if priority_rank as f64 <= important_cutoff {
                RecommendationLevel::Important
            } else {
                RecommendationLevel::Optional
            };
            RankedSpare {
                spare_part,
                usage_frequency,
                priority_rank,
                recommendation,
            }
        })
        .collect()
}

/// Reporte aplanado (vehículo × falla × repuesto) para exportación
pub fn build_report(
    summaries: &[VehicleFaultSummary],
    patterns: &[FaultPatternRow],
    correlations: &[SpareCorrelationRow],
) -> Vec<ReportRow> {
    let mut report = Vec::new();
    for vehicle in summaries {
        for pattern in patterns.iter().filter(|p| p.eqptid == vehicle.eqptid) {
            for part in correlations.iter().filter(|c| c.faults == pattern.faults) {
                report.push(ReportRow {
                    registration_no: vehicle.regnno.clone(),
                    equipment_type: vehicle.nomenclature.clone(),
                    fault: pattern.faults.clone(),
                    fault_frequency: pattern.fault_frequency,
                    spare_part: part.spare_part.clone(),
                    part_usage_frequency: part.usage_frequency,
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(eqptid: i32, regnno: &str, faults: &str, frequency: i64) -> FaultPatternRow {
        FaultPatternRow {
            eqptid,
            regnno: regnno.to_string(),
            nomenclature: Some("Military Truck".to_string()),
            faults: faults.to_string(),
            fault_frequency: frequency,
        }
    }

    fn correlation(faults: &str, spare: &str, frequency: i64) -> SpareCorrelationRow {
        SpareCorrelationRow {
            faults: faults.to_string(),
            spare_part: spare.to_string(),
            usage_frequency: frequency,
        }
    }

    #[test]
    fn test_summarize_vehicles() {
        let patterns = vec![
            pattern(1, "DEF12345", "Engine overheating", 4),
            pattern(1, "DEF12345", "Transmission failure", 2),
            pattern(2, "TRK77889", "Brake system failure", 3),
        ];
        let summaries = summarize_vehicles(&patterns);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].total_fault_occurrences, 6);
        assert_eq!(summaries[0].unique_faults, 2);
        assert_eq!(summaries[1].regnno, "TRK77889");
        assert_eq!(summaries[1].unique_faults, 1);
    }

    #[test]
    fn test_top_faults_aggregates_across_vehicles() {
        let patterns = vec![
            pattern(1, "DEF12345", "Engine overheating", 4),
            pattern(2, "TRK77889", "Engine overheating", 3),
            pattern(2, "TRK77889", "Brake system failure", 5),
        ];
        let top = top_faults(&patterns, 10);

        assert_eq!(top[0].faults, "Engine overheating");
        assert_eq!(top[0].total_frequency, 7);
        assert_eq!(top[1].total_frequency, 5);
    }

    #[test]
    fn test_top_faults_limit() {
        let patterns: Vec<FaultPatternRow> = (0..15)
            .map(|i| pattern(1, "DEF12345", &format!("Fault {:02}", i), 15 - i))
            .collect();
        assert_eq!(top_faults(&patterns, 10).len(), 10);
    }

    #[test]
    fn test_dense_rank_shares_and_has_no_gaps() {
        let correlations = vec![
            correlation("A", "Radiator", 9),
            correlation("A", "Coolant pump", 9),
            correlation("B", "Brake pads", 4),
        ];
        let ranked = rank_spares(&correlations);

        assert_eq!(ranked[0].priority_rank, 1);
        assert_eq!(ranked[1].priority_rank, 1);
        // Sin hueco: el siguiente valor distinto toma el rango 2
        assert_eq!(ranked[2].priority_rank, 2);
    }

    #[test]
    fn test_tiering_with_ten_distinct_ranks() {
        // 10 frecuencias distintas -> rangos 1-10
        let correlations: Vec<SpareCorrelationRow> = (1..=10)
            .map(|i| correlation("A", &format!("Part {:02}", i), 100 - i))
            .collect();
        let ranked = rank_spares(&correlations);

        for spare in &ranked {
            let expected = if spare.priority_rank <= 2 {
                RecommendationLevel::Critical
            } else if spare.priority_rank <= 5 {
                RecommendationLevel::Important
            } else {
                RecommendationLevel::Optional
            };
            assert_eq!(spare.recommendation, expected, "rango {}", spare.priority_rank);
        }
    }

    #[test]
    fn test_tiering_minimums_with_few_ranks() {
        // 2 rangos distintos: max(1, 0.4) = 1 crítico, max(2, 1.0) = 2 importante
        let correlations = vec![
            correlation("A", "Radiator", 5),
            correlation("A", "Brake pads", 3),
        ];
        let ranked = rank_spares(&correlations);
        assert_eq!(ranked[0].recommendation, RecommendationLevel::Critical);
        assert_eq!(ranked[1].recommendation, RecommendationLevel::Important);
    }

    #[test]
    fn test_rank_spares_sums_across_faults() {
        let correlations = vec![
            correlation("A", "Radiator", 2),
            correlation("B", "Radiator", 3),
            correlation("B", "Brake pads", 4),
        ];
        let ranked = rank_spares(&correlations);
        assert_eq!(ranked[0].spare_part, "Radiator");
        assert_eq!(ranked[0].usage_frequency, 5);
    }

    #[test]
    fn test_distinct_faults_preserves_order() {
        let patterns = vec![
            pattern(1, "DEF12345", "Engine overheating", 4),
            pattern(2, "TRK77889", "Brake system failure", 3),
            pattern(2, "TRK77889", "Engine overheating", 1),
        ];
        assert_eq!(
            distinct_faults(&patterns),
            vec!["Engine overheating".to_string(), "Brake system failure".to_string()]
        );
    }

    #[test]
    fn test_build_report_flattens_cross_reference() {
        let patterns = vec![
            pattern(1, "DEF12345", "Engine overheating", 4),
            pattern(2, "TRK77889", "Brake system failure", 3),
        ];
        let correlations = vec![
            correlation("Engine overheating", "Radiator", 5),
            correlation("Engine overheating", "Coolant pump", 2),
            correlation("Brake system failure", "Brake pads", 6),
        ];
        let summaries = summarize_vehicles(&patterns);
        let report = build_report(&summaries, &patterns, &correlations);

        assert_eq!(report.len(), 3);
        assert_eq!(report[0].registration_no, "DEF12345");
        assert_eq!(report[0].spare_part, "Radiator");
        assert_eq!(report[2].fault, "Brake system failure");
        assert_eq!(report[2].part_usage_frequency, 6);
    }
}
