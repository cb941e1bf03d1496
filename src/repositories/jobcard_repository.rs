//! Repositorio de tarjetas de trabajo
//!
//! El join de 6 tablas que alimenta al agregador: equipo → tarjeta →
//! detalle → falla, y tarjeta → emisión de repuesto → stock. El join
//! produce fan-out deliberadamente; el colapso ocurre en el agregador.

use sqlx::PgPool;

use crate::models::jobcard::JobcardJoinRow;
use crate::utils::errors::{AppError, AppResult};

pub struct JobcardRepository {
    pool: PgPool,
}

impl JobcardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filas del join por matrícula, acotadas a emisiones con cantidad
    /// positiva (la ausencia de repuestos pasa como null) y ordenadas por
    /// fecha de tarjeta descendente
    pub async fn history_rows(
        &self,
        regnno: &str,
        min_year: Option<i32>,
    ) -> AppResult<Vec<JobcardJoinRow>> {
        let mut sql = String::from(
            r#"
            SELECT e.regnno, e.nomenclature, j.jobcardno, j.jobcarddate,
                   f.faults, sm.itemname, tr.issues::bigint AS issues
            FROM teqptrecord e
            LEFT JOIN jobcard j ON e.id = j.referid
            LEFT JOIN jobcarddetails jd ON j.id = jd.refjobno
            LEFT JOIN tfaults f ON jd.fault = f.faultid
            LEFT JOIN tsstransactionregister tr ON j.id = tr.refjobid
            LEFT JOIN tssstockmaster sm ON tr.partnoid = sm.id
            WHERE e.regnno = $1
              AND (tr.issues > 0 OR tr.issues IS NULL)
            "#,
        );

        if min_year.is_some() {
            sql.push_str(" AND EXTRACT(YEAR FROM j.jobcarddate) >= $2");
        }
        sql.push_str(" ORDER BY j.jobcarddate DESC");

        let mut query = sqlx::query_as::<_, JobcardJoinRow>(&sql).bind(regnno);
        if let Some(min_year) = min_year {
            query = query.bind(min_year);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error fetching jobcard history: {}", e)))
    }
}
