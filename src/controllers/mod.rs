//! Controladores de la API
//!
//! Orquestación entre rutas, validación y servicios.

pub mod equipment_controller;
pub mod journey_controller;
