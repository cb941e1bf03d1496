//! Controlador de equipos
//!
//! Valida los parámetros de la request y orquesta el servicio de equipos.

use std::sync::Arc;

use sqlx::PgPool;

use crate::dto::equipment_dto::ApiResponse;
use crate::models::equipment::{EquipmentFilter, SubcategoryRow, UserUnitRow};
use crate::repositories::equipment_repository::EquipmentRepository;
use crate::services::equipment_service::{
    EquipmentOverview, EquipmentService, VehicleFaultHistory, VehicleFaultSummaryView,
    VehicleForecast, VehicleHistory, VehicleRecentFaults,
};
use crate::services::odometer_service::OdometerLookup;
use crate::utils::errors::{bad_request_error, AppResult};

pub struct EquipmentController {
    service: EquipmentService,
    repository: EquipmentRepository,
}

impl EquipmentController {
    pub fn new(pool: PgPool, odometer: Arc<OdometerLookup>) -> Self {
        Self {
            service: EquipmentService::new(pool.clone(), odometer),
            repository: EquipmentRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        subcat_id: Option<i32>,
        user_unit_id: Option<i32>,
        min_year: Option<i32>,
    ) -> AppResult<ApiResponse<EquipmentOverview>> {
        validate_min_year(min_year)?;
        let filter = EquipmentFilter {
            subcat_id,
            user_unit_id,
            min_year,
        };
        let overview = self.service.overview(&filter).await?;
        if overview.warnings.is_empty() {
            Ok(ApiResponse::success(overview))
        } else {
            let message = overview.warnings.join("; ");
            Ok(ApiResponse::success_with_message(overview, message))
        }
    }

    pub async fn history(
        &self,
        regnno: &str,
        min_year: Option<i32>,
    ) -> AppResult<ApiResponse<VehicleHistory>> {
        validate_min_year(min_year)?;
        let history = self.service.jobcard_history(regnno, min_year).await?;
        Ok(ApiResponse::success(history))
    }

    pub async fn recent_faults(
        &self,
        regnno: &str,
        min_year: Option<i32>,
    ) -> AppResult<ApiResponse<VehicleRecentFaults>> {
        validate_min_year(min_year)?;
        let recent = self.service.recent_faults(regnno, min_year).await?;
        Ok(ApiResponse::success(recent))
    }

    pub async fn fault_history(&self, regnno: &str) -> AppResult<ApiResponse<VehicleFaultHistory>> {
        let history = self.service.fault_history(regnno).await?;
        Ok(ApiResponse::success(history))
    }

    pub async fn fault_summary(
        &self,
        regnno: &str,
        min_year: Option<i32>,
    ) -> AppResult<ApiResponse<VehicleFaultSummaryView>> {
        validate_min_year(min_year)?;
        let summary = self.service.fault_summary(regnno, min_year).await?;
        Ok(ApiResponse::success(summary))
    }

    pub async fn maintenance_forecast(
        &self,
        regnno: &str,
        travel_km: Option<i64>,
    ) -> AppResult<ApiResponse<VehicleForecast>> {
        if let Some(travel) = travel_km {
            if travel < 0 {
                return Err(bad_request_error("travel_km must be non-negative"));
            }
        }
        let forecast = self.service.maintenance_forecast(regnno, travel_km).await?;
        Ok(ApiResponse::success(forecast))
    }

    pub async fn subcategories(&self) -> AppResult<ApiResponse<Vec<SubcategoryRow>>> {
        let subcategories = self.repository.subcategories().await?;
        Ok(ApiResponse::success(subcategories))
    }

    pub async fn user_units(&self) -> AppResult<ApiResponse<Vec<UserUnitRow>>> {
        let units = self.repository.user_units().await?;
        Ok(ApiResponse::success(units))
    }
}

/// El filtro de año acepta el rango que ofrecía el selector original
fn validate_min_year(min_year: Option<i32>) -> AppResult<()> {
    match min_year {
        Some(year) if !(1900..=2100).contains(&year) => {
            Err(bad_request_error("min_year must be between 1900 and 2100"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_min_year() {
        assert!(validate_min_year(None).is_ok());
        assert!(validate_min_year(Some(2015)).is_ok());
        assert!(validate_min_year(Some(1899)).is_err());
        assert!(validate_min_year(Some(2101)).is_err());
    }
}
