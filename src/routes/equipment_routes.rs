//! Rutas de equipos y filtros

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::equipment_controller::EquipmentController;
use crate::dto::equipment_dto::{
    ApiResponse, EquipmentListQuery, ForecastQuery, HistoryQuery,
};
use crate::models::equipment::{SubcategoryRow, UserUnitRow};
use crate::services::equipment_service::{
    EquipmentOverview, VehicleFaultHistory, VehicleFaultSummaryView, VehicleForecast,
    VehicleHistory, VehicleRecentFaults,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_equipment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_equipment))
        .route("/:regnno/history", get(get_history))
        .route("/:regnno/recent-faults", get(get_recent_faults))
        .route("/:regnno/fault-history", get(get_fault_history))
        .route("/:regnno/fault-summary", get(get_fault_summary))
        .route("/:regnno/maintenance-forecast", get(get_maintenance_forecast))
}

pub fn create_filter_router() -> Router<AppState> {
    Router::new()
        .route("/subcategories", get(get_subcategories))
        .route("/user-units", get(get_user_units))
}

async fn list_equipment(
    State(state): State<AppState>,
    Query(params): Query<EquipmentListQuery>,
) -> Result<Json<ApiResponse<EquipmentOverview>>, AppError> {
    let controller = EquipmentController::new(state.pool.clone(), state.odometer.clone());
    let response = controller
        .list(params.subcat_id, params.user_unit_id, params.min_year)
        .await?;
    Ok(Json(response))
}

async fn get_history(
    State(state): State<AppState>,
    Path(regnno): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<VehicleHistory>>, AppError> {
    let controller = EquipmentController::new(state.pool.clone(), state.odometer.clone());
    let response = controller.history(&regnno, params.min_year).await?;
    Ok(Json(response))
}

async fn get_recent_faults(
    State(state): State<AppState>,
    Path(regnno): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<VehicleRecentFaults>>, AppError> {
    let controller = EquipmentController::new(state.pool.clone(), state.odometer.clone());
    let response = controller.recent_faults(&regnno, params.min_year).await?;
    Ok(Json(response))
}

async fn get_fault_history(
    State(state): State<AppState>,
    Path(regnno): Path<String>,
) -> Result<Json<ApiResponse<VehicleFaultHistory>>, AppError> {
    let controller = EquipmentController::new(state.pool.clone(), state.odometer.clone());
    let response = controller.fault_history(&regnno).await?;
    Ok(Json(response))
}

async fn get_fault_summary(
    State(state): State<AppState>,
    Path(regnno): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<VehicleFaultSummaryView>>, AppError> {
    let controller = EquipmentController::new(state.pool.clone(), state.odometer.clone());
    let response = controller.fault_summary(&regnno, params.min_year).await?;
    Ok(Json(response))
}

async fn get_maintenance_forecast(
    State(state): State<AppState>,
    Path(regnno): Path<String>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ApiResponse<VehicleForecast>>, AppError> {
    let controller = EquipmentController::new(state.pool.clone(), state.odometer.clone());
    let response = controller
        .maintenance_forecast(&regnno, params.travel_km)
        .await?;
    Ok(Json(response))
}

async fn get_subcategories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SubcategoryRow>>>, AppError> {
    let controller = EquipmentController::new(state.pool.clone(), state.odometer.clone());
    let response = controller.subcategories().await?;
    Ok(Json(response))
}

async fn get_user_units(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserUnitRow>>>, AppError> {
    let controller = EquipmentController::new(state.pool.clone(), state.odometer.clone());
    let response = controller.user_units().await?;
    Ok(Json(response))
}
