//! DTOs del recomendador de trayecto

use serde::Deserialize;
use validator::Validate;

/// Selección de vehículos para la recomendación de repuestos.
/// Una selección vacía es legal: produce el estado NoVehiclesSelected.
#[derive(Debug, Deserialize, Validate)]
pub struct JourneyRecommendationRequest {
    #[validate(length(max = 200, message = "Too many vehicles selected"))]
    pub equipment_ids: Vec<i32>,
}
