//! Repositorio de patrones de falla y repuestos
//!
//! Consultas del recomendador: frecuencia de fallas por vehículo
//! seleccionado y frecuencia de uso de repuestos por falla. Los listados
//! IN se arman con placeholders numerados y ligados, nunca interpolando
//! los valores.

use sqlx::PgPool;

use crate::models::recommendation::{FaultPatternRow, SpareCorrelationRow};
use crate::utils::errors::{AppError, AppResult};

pub struct SparesRepository {
    pool: PgPool,
}

impl SparesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Frecuencia de cada falla por vehículo seleccionado, ordenada por
    /// matrícula y frecuencia descendente
    pub async fn fault_patterns(&self, equipment_ids: &[i32]) -> AppResult<Vec<FaultPatternRow>> {
        if equipment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = numbered_placeholders(equipment_ids.len());
        let sql = format!(
            r#"
            SELECT r.id AS eqptid, r.regnno, r.nomenclature, f.faults,
                   COUNT(*) AS fault_frequency
            FROM teqptrecord r
            LEFT JOIN jobcard jc ON r.id = jc.referid
            LEFT JOIN jobcarddetails jcd ON jc.id = jcd.refjobno
            LEFT JOIN tfaults f ON jcd.fault = f.faultid
            WHERE r.id IN ({})
            AND f.faults IS NOT NULL
            GROUP BY r.id, r.regnno, r.nomenclature, f.faults
            ORDER BY r.regnno, fault_frequency DESC
            "#,
            placeholders
        );

        let mut query = sqlx::query_as::<_, FaultPatternRow>(&sql);
        for id in equipment_ids {
            query = query.bind(id);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error fetching fault patterns: {}", e)))
    }

    /// Frecuencia de uso de cada repuesto por descripción de falla,
    /// acotada a emisiones con cantidad positiva
    pub async fn spare_correlations(
        &self,
        fault_names: &[String],
    ) -> AppResult<Vec<SpareCorrelationRow>> {
        if fault_names.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = numbered_placeholders(fault_names.len());
        let sql = format!(
            r#"
            SELECT f.faults, sm.itemname AS spare_part,
                   COUNT(*) AS usage_frequency
            FROM tfaults f
            LEFT JOIN jobcarddetails jcd ON f.faultid = jcd.fault
            LEFT JOIN jobcard jc ON jcd.refjobno = jc.id
            LEFT JOIN tsstransactionregister tr ON jc.id = tr.refjobid
            LEFT JOIN tssstockmaster sm ON tr.partnoid = sm.id
            WHERE f.faults IN ({})
            AND sm.itemname IS NOT NULL
            AND tr.issues > 0
            GROUP BY f.faults, sm.itemname
            ORDER BY f.faults, usage_frequency DESC
            "#,
            placeholders
        );

        let mut query = sqlx::query_as::<_, SpareCorrelationRow>(&sql);
        for fault in fault_names {
            query = query.bind(fault);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error fetching spare correlations: {}", e)))
    }
}

/// `$1,$2,...,$n` para un listado IN ligado
fn numbered_placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_placeholders() {
        assert_eq!(numbered_placeholders(1), "$1");
        assert_eq!(numbered_placeholders(3), "$1,$2,$3");
    }
}
