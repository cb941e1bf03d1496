//! Modelos de equipos
//!
//! Filas crudas del store relacional y el registro enriquecido por vehículo
//! que consume la capa de presentación.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::reliability::{Priority, Signal};

/// Fila cruda de `teqptrecord` con su unidad propietaria.
/// `inkm` es texto en el store; la coerción numérica ocurre en el
/// reconciliador de odómetro.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EquipmentRow {
    pub eqptid: i32,
    pub regnno: String,
    pub nomenclature: Option<String>,
    pub dtofissue: Option<NaiveDate>,
    pub inkm: Option<String>,
    pub userunit_name: Option<String>,
}

impl EquipmentRow {
    /// Año de antigüedad derivado de la fecha de emisión
    pub fn issue_year(&self) -> Option<i64> {
        self.dtofissue.map(|d| d.year() as i64)
    }
}

/// Fila cruda (equipo, descripción de falla) del join equipo → falla
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EquipmentFaultRow {
    pub eqptid: i32,
    pub faultdescription: String,
}

/// Fila cruda de conteo crítico: una por línea de trabajo crítica
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CriticalFaultRow {
    pub eqptid: i32,
}

/// Subcategoría de la categoría fija `B`
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SubcategoryRow {
    pub subcatid: i32,
    pub subcategoryname: String,
}

/// Unidad usuaria activa
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserUnitRow {
    pub userunit_id: i32,
    pub userunit_name: String,
}

/// Filtros opcionales del listado de equipos (request-scoped, sin estado
/// ambiente)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentFilter {
    pub subcat_id: Option<i32>,
    pub user_unit_id: Option<i32>,
    pub min_year: Option<i32>,
}

/// Registro por vehículo enriquecido con señales y prioridad
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentRecord {
    pub eqptid: i32,
    pub regnno: String,
    pub nomenclature: Option<String>,
    pub dtofissue: Option<NaiveDate>,
    pub userunit_name: Option<String>,
    pub inkm: i64,
    pub totalfaultcount: i64,
    pub allfaults: String,
    pub totalcriticalfaultcount: i64,
    pub respect_to_vintage: Signal,
    pub respect_to_distance: Signal,
    pub respect_to_critical_faults: Signal,
    pub priority: Priority,
}

/// Conteo y descripciones de fallas agregadas por equipo
#[derive(Debug, Clone, PartialEq)]
pub struct FaultTotals {
    pub count: i64,
    pub descriptions: String,
}
