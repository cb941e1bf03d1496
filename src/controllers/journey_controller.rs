//! Controlador del recomendador de trayecto

use sqlx::PgPool;
use validator::Validate;

use crate::dto::equipment_dto::ApiResponse;
use crate::dto::journey_dto::JourneyRecommendationRequest;
use crate::models::recommendation::JourneyOutcome;
use crate::services::recommendation_service::RecommendationService;
use crate::utils::errors::AppResult;

pub struct JourneyController {
    service: RecommendationService,
}

impl JourneyController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: RecommendationService::new(pool),
        }
    }

    pub async fn recommend(
        &self,
        request: JourneyRecommendationRequest,
    ) -> AppResult<ApiResponse<JourneyOutcome>> {
        request.validate()?;
        let outcome = self.service.recommend(&request.equipment_ids).await?;
        Ok(ApiResponse::success(outcome))
    }
}
