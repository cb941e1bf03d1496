//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del dominio: equipos,
//! tarjetas de trabajo, fiabilidad, recomendaciones y mantenimiento.

pub mod equipment;
pub mod jobcard;
pub mod maintenance;
pub mod recommendation;
pub mod reliability;
