//! Repositorios de acceso a datos
//!
//! Consultas parametrizadas de solo lectura sobre PostgreSQL.

pub mod equipment_repository;
pub mod jobcard_repository;
pub mod spares_repository;
