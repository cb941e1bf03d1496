//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el
//! agregador de fallas/repuestos, el reconciliador de odómetro, el
//! constructor de vistas de equipos, el recomendador de repuestos y el
//! pronóstico de mantenimiento.

pub mod aggregation_service;
pub mod equipment_service;
pub mod maintenance_service;
pub mod odometer_service;
pub mod recommendation_service;
