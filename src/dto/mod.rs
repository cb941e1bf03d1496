//! DTOs de la API
//!
//! Requests y responses tipados de la capa HTTP.

pub mod equipment_dto;
pub mod journey_dto;
