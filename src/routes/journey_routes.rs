//! Rutas del recomendador de trayecto

use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::journey_controller::JourneyController;
use crate::dto::equipment_dto::ApiResponse;
use crate::dto::journey_dto::JourneyRecommendationRequest;
use crate::models::recommendation::JourneyOutcome;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_journey_router() -> Router<AppState> {
    Router::new().route("/recommendations", post(recommend_spares))
}

async fn recommend_spares(
    State(state): State<AppState>,
    Json(request): Json<JourneyRecommendationRequest>,
) -> Result<Json<ApiResponse<JourneyOutcome>>, AppError> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.recommend(request).await?;
    Ok(Json(response))
}
