//! Agregador de fallas y repuestos
//!
//! Colapsa las filas crudas del join (una por tarjeta × falla × repuesto)
//! en una fila por tarjeta de trabajo, y produce los resúmenes derivados:
//! por descripción de falla, ventana reciente, histórico completo y
//! métricas del historial. Todas las funciones son puras: agrupación
//! explícita (clave → filas miembro) seguida de un reductor por campo.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::models::jobcard::{
    EquipmentHeader, FaultHistoryMetrics, FaultHistoryRow, FaultSummaryRow, HistoryMetrics,
    JobcardJoinRow, JobcardSummary, RecentFaultMetrics, RecentFaultRow,
};

/// Delimitador del colapso por tarjeta. El desglose reciente y el histórico
/// separan sobre este mismo delimitador: cambiarlo aquí exige cambiarlo allá.
pub const FAULT_DELIMITER: &str = "; ";

/// Texto mostrado cuando una tarjeta no tiene fallas registradas
pub const NO_FAULTS: &str = "No faults recorded";

/// Texto mostrado cuando una tarjeta no consumió repuestos
pub const NO_SPARES: &str = "No spares used";

/// Ventana evaluada del desglose de fallas recientes
pub const RECENT_JOBCARDS_WINDOW: usize = 20;

/// Cabecera del vehículo a partir de la primera fila del join ordenado
/// (primera-fila-gana, riesgo aceptado si los valores denormalizados
/// fueran inconsistentes entre filas).
pub fn header_from_rows(rows: &[JobcardJoinRow]) -> Option<EquipmentHeader> {
    rows.first().and_then(|row| {
        row.regnno.as_ref().map(|regnno| EquipmentHeader {
            regnno: regnno.clone(),
            nomenclature: row.nomenclature.clone(),
        })
    })
}

/// Colapso por tarjeta: agrupa por (jobcardno, jobcarddate) y deduplica
/// fallas y repuestos dentro del grupo. Las filas sin clave de tarjeta se
/// omiten, así un vehículo sin tarjetas colapsa a un conjunto vacío.
/// Los grupos se emiten en orden ascendente de clave.
pub fn collapse_jobcards(rows: &[JobcardJoinRow]) -> Vec<JobcardSummary> {
    let mut groups: BTreeMap<(String, NaiveDate), Vec<&JobcardJoinRow>> = BTreeMap::new();

    for row in rows {
        let (Some(jobcardno), Some(jobcarddate)) = (&row.jobcardno, row.jobcarddate) else {
            continue;
        };
        groups
            .entry((jobcardno.clone(), jobcarddate))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .map(|((jobcardno, jobcarddate), members)| {
            // Distintos en orden de primera aparición, como el join original
            let mut faults: Vec<&str> = Vec::new();
            let mut spares: Vec<&str> = Vec::new();
            let mut issues: Option<i64> = None;

            for member in &members {
                if let Some(fault) = member.faults.as_deref() {
                    if !fault.is_empty() && !faults.contains(&fault) {
                        faults.push(fault);
                    }
                }
                if let Some(item) = member.itemname.as_deref() {
                    if !item.is_empty() && !spares.contains(&item) {
                        spares.push(item);
                    }
                }
                if let Some(qty) = member.issues {
                    issues = Some(issues.unwrap_or(0) + qty);
                }
            }

            JobcardSummary {
                jobcardno,
                jobcarddate,
                faults: join_or_default(&faults, NO_FAULTS),
                spares: join_or_default(&spares, NO_SPARES),
                issues,
            }
        })
        .collect()
}

fn join_or_default(values: &[&str], default: &str) -> String {
    if values.is_empty() {
        default.to_string()
    } else {
        values.join(FAULT_DELIMITER)
    }
}

/// Invierte el colapso: descripciones individuales de un campo delimitado
fn split_descriptions(joined: &str) -> impl Iterator<Item = &str> {
    joined
        .split(FAULT_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// Métricas del historial completo sobre la vista colapsada
pub fn history_metrics(collapsed: &[JobcardSummary]) -> HistoryMetrics {
    let total_jobcards = collapsed
        .iter()
        .map(|job| job.jobcardno.as_str())
        .collect::<HashSet<_>>()
        .len();

    let unique_faults = collapsed
        .iter()
        .filter(|job| job.faults != NO_FAULTS)
        .flat_map(|job| split_descriptions(&job.faults))
        .collect::<HashSet<_>>()
        .len();

    let unique_spares = collapsed
        .iter()
        .filter(|job| job.spares != NO_SPARES)
        .flat_map(|job| split_descriptions(&job.spares))
        .collect::<HashSet<_>>()
        .len();

    HistoryMetrics {
        total_jobcards,
        unique_faults,
        unique_spares,
    }
}

/// Resumen por descripción de falla: ocurrencias y repuestos distintos
/// asociados (ordenados alfabéticamente, unidos con ", "). Ordenado por
/// conteo descendente, descripción ascendente en empates.
pub fn fault_summary(collapsed: &[JobcardSummary]) -> Vec<FaultSummaryRow> {
    let mut groups: BTreeMap<&str, (i64, HashSet<&str>)> = BTreeMap::new();

    for job in collapsed {
        if job.faults == NO_FAULTS {
            continue;
        }
        for fault in split_descriptions(&job.faults) {
            let entry = groups.entry(fault).or_default();
            entry.0 += 1;
            if job.spares != NO_SPARES {
                entry.1.extend(split_descriptions(&job.spares));
            }
        }
    }

    let mut summary: Vec<FaultSummaryRow> = groups
        .into_iter()
        .map(|(fault, (count, spares))| {
            let mut names: Vec<&str> = spares.into_iter().collect();
            names.sort_unstable();
            FaultSummaryRow {
                fault_description: fault.to_string(),
                fault_count: count,
                spares: if names.is_empty() {
                    NO_SPARES.to_string()
                } else {
                    names.join(", ")
                },
            }
        })
        .collect();

    summary.sort_by(|a, b| b.fault_count.cmp(&a.fault_count));
    summary
}

/// Desglose de fallas recientes: las N tarjetas más recientes con fallas,
/// separadas de vuelta en descripciones individuales. La columna de
/// repuestos conserva las cadenas completas por tarjeta, distintas y
/// ordenadas. Resultado ordenado por última ocurrencia descendente.
pub fn recent_fault_breakdown(
    collapsed: &[JobcardSummary],
    window: usize,
) -> (Vec<RecentFaultRow>, RecentFaultMetrics) {
    let mut with_faults: Vec<&JobcardSummary> = collapsed
        .iter()
        .filter(|job| job.faults != NO_FAULTS)
        .collect();
    with_faults.sort_by(|a, b| b.jobcarddate.cmp(&a.jobcarddate));
    with_faults.truncate(window);

    let mut groups: BTreeMap<&str, (i64, HashSet<&str>, NaiveDate)> = BTreeMap::new();

    for job in &with_faults {
        for fault in split_descriptions(&job.faults) {
            let entry = groups
                .entry(fault)
                .or_insert((0, HashSet::new(), job.jobcarddate));
            entry.0 += 1;
            entry.1.insert(job.spares.as_str());
            if job.jobcarddate > entry.2 {
                entry.2 = job.jobcarddate;
            }
        }
    }

    let mut breakdown: Vec<RecentFaultRow> = groups
        .into_iter()
        .map(|(fault, (count, spares, last))| {
            let mut names: Vec<&str> = spares.into_iter().collect();
            names.sort_unstable();
            RecentFaultRow {
                fault_description: fault.to_string(),
                fault_count: count,
                spares: names.join(FAULT_DELIMITER),
                last_occurrence: last,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| b.last_occurrence.cmp(&a.last_occurrence));

    let metrics = RecentFaultMetrics {
        recent_unique_faults: breakdown.len(),
        recent_fault_occurrences: breakdown.iter().map(|row| row.fault_count).sum(),
        most_recent_fault_count: breakdown.first().map(|row| row.fault_count),
    };

    (breakdown, metrics)
}

/// Tabla histórica completa: ocurrencias por descripción sobre la vista
/// colapsada sin acotar, ordenada por (conteo desc, descripción asc).
pub fn fault_history(collapsed: &[JobcardSummary]) -> (Vec<FaultHistoryRow>, FaultHistoryMetrics) {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();

    for job in collapsed {
        if job.faults == NO_FAULTS {
            continue;
        }
        for fault in split_descriptions(&job.faults) {
            *counts.entry(fault).or_default() += 1;
        }
    }

    let mut history: Vec<FaultHistoryRow> = counts
        .into_iter()
        .map(|(fault, count)| FaultHistoryRow {
            fault_description: fault.to_string(),
            count,
        })
        .collect();

    history.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.fault_description.cmp(&b.fault_description))
    });

    let metrics = FaultHistoryMetrics {
        unique_faults: history.len(),
        total_occurrences: history.iter().map(|row| row.count).sum(),
        highest_count: history.first().map(|row| row.count),
    };

    (history, metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(
        jobcardno: Option<&str>,
        jobcarddate: Option<NaiveDate>,
        faults: Option<&str>,
        itemname: Option<&str>,
        issues: Option<i64>,
    ) -> JobcardJoinRow {
        JobcardJoinRow {
            regnno: Some("DEF12345".to_string()),
            nomenclature: Some("T-90 Main Battle Tank".to_string()),
            jobcardno: jobcardno.map(str::to_string),
            jobcarddate,
            faults: faults.map(str::to_string),
            itemname: itemname.map(str::to_string),
            issues,
        }
    }

    /// Tarjeta con 3 fallas y 2 repuestos: el join produce 6 filas
    fn fanout_rows() -> Vec<JobcardJoinRow> {
        let d = date(2023, 6, 1);
        let mut rows = Vec::new();
        for fault in ["Engine overheating", "Transmission failure", "Brake system failure"] {
            for (item, qty) in [("Radiator", 1_i64), ("Coolant pump", 2)] {
                rows.push(row(Some("JC001/2023"), Some(d), Some(fault), Some(item), Some(qty)));
            }
        }
        rows
    }

    #[test]
    fn test_collapse_deduplicates_fanout() {
        let collapsed = collapse_jobcards(&fanout_rows());
        assert_eq!(collapsed.len(), 1);

        let job = &collapsed[0];
        assert_eq!(
            job.faults,
            "Engine overheating; Transmission failure; Brake system failure"
        );
        assert_eq!(job.spares, "Radiator; Coolant pump");
        // 6 filas de (1 + 2) alternados
        assert_eq!(job.issues, Some(9));
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let rows = fanout_rows();
        let first = collapse_jobcards(&rows);
        let second = collapse_jobcards(&rows);
        assert_eq!(first, second);
    }

    #[test]
    fn test_collapse_defaults_and_null_issues() {
        let d = date(2023, 7, 1);
        let rows = vec![row(Some("JC002/2023"), Some(d), Some("Suspension damage"), None, None)];
        let collapsed = collapse_jobcards(&rows);

        assert_eq!(collapsed.len(), 1);
        assert_eq!(collapsed[0].spares, NO_SPARES);
        // Sin filas de emisión la suma es None, no cero
        assert_eq!(collapsed[0].issues, None);

        let rows = vec![row(Some("JC003/2023"), Some(d), None, None, None)];
        let collapsed = collapse_jobcards(&rows);
        assert_eq!(collapsed[0].faults, NO_FAULTS);
    }

    #[test]
    fn test_collapse_skips_keyless_rows() {
        // Vehículo sin tarjetas: el LEFT JOIN deja la clave en null
        let rows = vec![row(None, None, None, None, None)];
        assert!(collapse_jobcards(&rows).is_empty());
        assert!(collapse_jobcards(&[]).is_empty());
    }

    #[test]
    fn test_header_first_row_wins() {
        let rows = fanout_rows();
        let header = header_from_rows(&rows).unwrap();
        assert_eq!(header.regnno, "DEF12345");
        assert_eq!(header.nomenclature.as_deref(), Some("T-90 Main Battle Tank"));
        assert!(header_from_rows(&[]).is_none());
    }

    #[test]
    fn test_split_round_trip() {
        // Separar el campo colapsado reproduce el conjunto original
        let collapsed = collapse_jobcards(&fanout_rows());
        let parts: Vec<&str> = split_descriptions(&collapsed[0].faults).collect();
        assert_eq!(
            parts,
            vec!["Engine overheating", "Transmission failure", "Brake system failure"]
        );
    }

    #[test]
    fn test_history_metrics() {
        let d2 = date(2023, 7, 1);
        let mut rows = fanout_rows();
        rows.push(row(Some("JC002/2023"), Some(d2), Some("Engine overheating"), None, None));

        let collapsed = collapse_jobcards(&rows);
        let metrics = history_metrics(&collapsed);
        assert_eq!(metrics.total_jobcards, 2);
        assert_eq!(metrics.unique_faults, 3);
        assert_eq!(metrics.unique_spares, 2);
    }

    #[test]
    fn test_fault_summary_groups_by_description() {
        let mut rows = fanout_rows();
        rows.push(row(
            Some("JC002/2023"),
            Some(date(2023, 7, 1)),
            Some("Engine overheating"),
            Some("Thermostat"),
            Some(1),
        ));

        let collapsed = collapse_jobcards(&rows);
        let summary = fault_summary(&collapsed);

        assert_eq!(summary[0].fault_description, "Engine overheating");
        assert_eq!(summary[0].fault_count, 2);
        // Repuestos individuales distintos, orden alfabético
        assert_eq!(summary[0].spares, "Coolant pump, Radiator, Thermostat");

        let brake = summary
            .iter()
            .find(|row| row.fault_description == "Brake system failure")
            .unwrap();
        assert_eq!(brake.fault_count, 1);
    }

    #[test]
    fn test_fault_summary_without_spares() {
        let rows = vec![row(
            Some("JC004/2023"),
            Some(date(2023, 8, 1)),
            Some("Electrical short circuit"),
            None,
            None,
        )];
        let summary = fault_summary(&collapse_jobcards(&rows));
        assert_eq!(summary[0].spares, NO_SPARES);
    }

    #[test]
    fn test_recent_breakdown_window_and_order() {
        // 25 tarjetas de un día cada una; solo las 20 más recientes cuentan
        let mut rows = Vec::new();
        for day in 1..=25_u32 {
            let jobcardno = format!("JC{:03}/2023", day);
            rows.push(row(
                Some(jobcardno.as_str()),
                Some(date(2023, 3, day)),
                Some(if day > 5 { "Engine overheating" } else { "Old fault" }),
                None,
                None,
            ));
        }

        let collapsed = collapse_jobcards(&rows);
        let (breakdown, metrics) = recent_fault_breakdown(&collapsed, RECENT_JOBCARDS_WINDOW);

        // Las tarjetas con "Old fault" (días 1-5) quedan fuera de la ventana
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].fault_description, "Engine overheating");
        assert_eq!(breakdown[0].fault_count, 20);
        assert_eq!(breakdown[0].last_occurrence, date(2023, 3, 25));
        assert_eq!(metrics.recent_unique_faults, 1);
        assert_eq!(metrics.recent_fault_occurrences, 20);
        assert_eq!(metrics.most_recent_fault_count, Some(20));
    }

    #[test]
    fn test_recent_breakdown_keeps_jobcard_spare_strings() {
        let rows = vec![
            row(
                Some("JC001/2023"),
                Some(date(2023, 6, 1)),
                Some("Engine overheating"),
                Some("Radiator"),
                Some(1),
            ),
            row(
                Some("JC002/2023"),
                Some(date(2023, 7, 1)),
                Some("Engine overheating"),
                None,
                None,
            ),
        ];
        let collapsed = collapse_jobcards(&rows);
        let (breakdown, _) = recent_fault_breakdown(&collapsed, RECENT_JOBCARDS_WINDOW);

        assert_eq!(breakdown.len(), 1);
        // Cadenas completas por tarjeta, distintas y ordenadas
        assert_eq!(breakdown[0].spares, "No spares used; Radiator");
    }

    #[test]
    fn test_fault_history_sorted_by_count_then_name() {
        let rows = vec![
            row(Some("JC001/2023"), Some(date(2023, 1, 1)), Some("Brake system failure"), None, None),
            row(Some("JC002/2023"), Some(date(2023, 2, 1)), Some("Engine overheating"), None, None),
            row(Some("JC003/2023"), Some(date(2023, 3, 1)), Some("Engine overheating"), None, None),
            row(Some("JC004/2023"), Some(date(2023, 4, 1)), Some("Axle wear"), None, None),
        ];
        let collapsed = collapse_jobcards(&rows);
        let (history, metrics) = fault_history(&collapsed);

        assert_eq!(history[0].fault_description, "Engine overheating");
        assert_eq!(history[0].count, 2);
        // Empates en orden alfabético
        assert_eq!(history[1].fault_description, "Axle wear");
        assert_eq!(history[2].fault_description, "Brake system failure");

        assert_eq!(metrics.unique_faults, 3);
        assert_eq!(metrics.total_occurrences, 4);
        assert_eq!(metrics.highest_count, Some(2));
    }
}
