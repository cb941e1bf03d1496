//! Repositorio de equipos
//!
//! Consultas de solo lectura sobre el store relacional: registros de
//! equipo de la categoría `B` con filtros opcionales, conteos de fallas y
//! listas de opciones para los selectores. Todas las consultas usan
//! placeholders ligados, nunca concatenación de entrada no confiable.

use sqlx::PgPool;

use crate::models::equipment::{
    CriticalFaultRow, EquipmentFaultRow, EquipmentFilter, EquipmentRow, SubcategoryRow, UserUnitRow,
};
use crate::utils::errors::{AppError, AppResult};

pub struct EquipmentRepository {
    pool: PgPool,
}

impl EquipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registros de equipo de la categoría B con filtros opcionales de
    /// subcategoría, unidad usuaria y año mínimo de emisión
    pub async fn find_equipment(&self, filter: &EquipmentFilter) -> AppResult<Vec<EquipmentRow>> {
        let mut sql = String::from(
            r#"
            SELECT r.id AS eqptid, r.regnno, r.nomenclature, r.dtofissue, r.inkm, u.userunit_name
            FROM teqptrecord r
            LEFT JOIN tuserunit u ON r.userunit = u.userunit_id
            LEFT JOIN tsubcat s ON r.cat = s.subcatid
            WHERE s.categoryname = 'B'
            "#,
        );

        let mut placeholder = 0;
        if filter.subcat_id.is_some() {
            placeholder += 1;
            sql.push_str(&format!(" AND r.cat = ${}", placeholder));
        }
        if filter.user_unit_id.is_some() {
            placeholder += 1;
            sql.push_str(&format!(" AND r.userunit = ${}", placeholder));
        }
        if filter.min_year.is_some() {
            placeholder += 1;
            sql.push_str(&format!(
                " AND EXTRACT(YEAR FROM r.dtofissue) >= ${}",
                placeholder
            ));
        }
        sql.push_str(" ORDER BY r.regnno");

        let mut query = sqlx::query_as::<_, EquipmentRow>(&sql);
        if let Some(subcat_id) = filter.subcat_id {
            query = query.bind(subcat_id);
        }
        if let Some(user_unit_id) = filter.user_unit_id {
            query = query.bind(user_unit_id);
        }
        if let Some(min_year) = filter.min_year {
            query = query.bind(min_year);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error fetching equipment records: {}", e)))
    }

    /// Un equipo por matrícula exacta
    pub async fn find_by_regnno(&self, regnno: &str) -> AppResult<Option<EquipmentRow>> {
        sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT r.id AS eqptid, r.regnno, r.nomenclature, r.dtofissue, r.inkm, u.userunit_name
            FROM teqptrecord r
            LEFT JOIN tuserunit u ON r.userunit = u.userunit_id
            WHERE r.regnno = $1
            "#,
        )
        .bind(regnno)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error fetching equipment by regnno: {}", e)))
    }

    /// Filas crudas (equipo, descripción de falla) de todo el historial.
    /// Sin filtros: el conteo total del listado nunca se filtra.
    pub async fn fault_rows(&self) -> AppResult<Vec<EquipmentFaultRow>> {
        sqlx::query_as::<_, EquipmentFaultRow>(
            r#"
            SELECT r.id AS eqptid, f.faults AS faultdescription
            FROM teqptrecord r
            LEFT JOIN jobcard jc ON r.id = jc.referid
            LEFT JOIN jobcarddetails jcd ON jc.id = jcd.refjobno
            LEFT JOIN tfaults f ON jcd.fault = f.faultid
            WHERE f.faults IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error fetching fault rows: {}", e)))
    }

    /// Filas crudas de líneas de trabajo críticas, con los mismos filtros
    /// opcionales del listado (el año aplica a la fecha de la tarjeta)
    pub async fn critical_fault_rows(
        &self,
        filter: &EquipmentFilter,
    ) -> AppResult<Vec<CriticalFaultRow>> {
        let mut sql = String::from(
            r#"
            SELECT r.id AS eqptid
            FROM teqptrecord r
            LEFT JOIN jobcard jc ON r.id = jc.referid
            LEFT JOIN jobcarddetails jcd ON jc.id = jcd.refjobno
            LEFT JOIN tfaults f ON jcd.fault = f.faultid
            LEFT JOIN tsubcat s ON r.cat = s.subcatid
            LEFT JOIN tuserunit u ON r.userunit = u.userunit_id
            WHERE jcd.critical = 1 AND s.categoryname = 'B'
            "#,
        );

        let mut placeholder = 0;
        if filter.subcat_id.is_some() {
            placeholder += 1;
            sql.push_str(&format!(" AND r.cat = ${}", placeholder));
        }
        if filter.user_unit_id.is_some() {
            placeholder += 1;
            sql.push_str(&format!(" AND r.userunit = ${}", placeholder));
        }
        if filter.min_year.is_some() {
            placeholder += 1;
            sql.push_str(&format!(
                " AND EXTRACT(YEAR FROM jc.jobcarddate) >= ${}",
                placeholder
            ));
        }

        let mut query = sqlx::query_as::<_, CriticalFaultRow>(&sql);
        if let Some(subcat_id) = filter.subcat_id {
            query = query.bind(subcat_id);
        }
        if let Some(user_unit_id) = filter.user_unit_id {
            query = query.bind(user_unit_id);
        }
        if let Some(min_year) = filter.min_year {
            query = query.bind(min_year);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Error fetching critical fault rows: {}", e)))
    }

    /// Subcategorías de la categoría B para el selector
    pub async fn subcategories(&self) -> AppResult<Vec<SubcategoryRow>> {
        sqlx::query_as::<_, SubcategoryRow>(
            r#"
            SELECT subcatid, subcategoryname
            FROM tsubcat
            WHERE categoryname = 'B'
            AND subcategoryname IS NOT NULL
            ORDER BY subcategoryname
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error fetching subcategories: {}", e)))
    }

    /// Unidades usuarias activas para el selector
    pub async fn user_units(&self) -> AppResult<Vec<UserUnitRow>> {
        sqlx::query_as::<_, UserUnitRow>(
            r#"
            SELECT userunit_id, userunit_name
            FROM tuserunit
            WHERE movedout = false
            AND userunit_name IS NOT NULL
            ORDER BY userunit_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Error fetching user units: {}", e)))
    }
}
