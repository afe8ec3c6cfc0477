use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::controllers::fleet_controller::FleetController;
use crate::dto::ApiResponse;
use crate::middleware::SessionContext;
use crate::models::fleet::{
    AssignVehiculeRequest, Conducteur, CreateConducteurRequest, CreateMaintenanceRequest,
    CreateVehiculeRequest, MaintenanceRecord, Vehicule, VehiculeStatusRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Todas las rutas operan sobre la organización de la sesión
pub fn create_fleet_router() -> Router<AppState> {
    Router::new()
        .route("/vehicules", get(list_vehicules).post(create_vehicule))
        .route("/vehicules/:id/status", put(set_vehicule_status))
        .route("/vehicules/:id/maintenance", get(list_maintenance).post(record_maintenance))
        .route("/conducteurs", get(list_conducteurs).post(create_conducteur))
        .route("/conducteurs/:id/vehicule", put(assign_vehicule))
}

async fn create_vehicule(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<CreateVehiculeRequest>,
) -> Result<Json<ApiResponse<Vehicule>>, AppError> {
    let organisation_id = session.require_managed_organisation()?;
    let controller = FleetController::new(state.pool.clone());
    Ok(Json(controller.create_vehicule(organisation_id, request).await?))
}

async fn list_vehicules(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<ApiResponse<Vec<Vehicule>>>, AppError> {
    let organisation_id = session.require_managed_organisation()?;
    let controller = FleetController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.list_vehicules(organisation_id).await?)))
}

/// El vehículo debe estar en la flota de la organización de la sesión
async fn ensure_fleet_vehicule(
    controller: &FleetController,
    session: &SessionContext,
    vehicule_id: i32,
) -> Result<(), AppError> {
    let organisation_id = session.require_managed_organisation()?;
    controller.find_fleet_vehicule(organisation_id, vehicule_id).await?;
    Ok(())
}

async fn set_vehicule_status(
    State(state): State<AppState>,
    session: SessionContext,
    Path(vehicule_id): Path<i32>,
    Json(request): Json<VehiculeStatusRequest>,
) -> Result<Json<ApiResponse<Vehicule>>, AppError> {
    let controller = FleetController::new(state.pool.clone());
    ensure_fleet_vehicule(&controller, &session, vehicule_id).await?;
    let vehicule = controller.set_vehicule_status(vehicule_id, request.status).await?;
    Ok(Json(ApiResponse::success(vehicule)))
}

async fn record_maintenance(
    State(state): State<AppState>,
    session: SessionContext,
    Path(vehicule_id): Path<i32>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let controller = FleetController::new(state.pool.clone());
    ensure_fleet_vehicule(&controller, &session, vehicule_id).await?;
    Ok(Json(controller.record_maintenance(vehicule_id, request).await?))
}

async fn list_maintenance(
    State(state): State<AppState>,
    session: SessionContext,
    Path(vehicule_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<MaintenanceRecord>>>, AppError> {
    let controller = FleetController::new(state.pool.clone());
    ensure_fleet_vehicule(&controller, &session, vehicule_id).await?;
    Ok(Json(ApiResponse::success(controller.list_maintenance(vehicule_id).await?)))
}

async fn create_conducteur(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<CreateConducteurRequest>,
) -> Result<Json<ApiResponse<Conducteur>>, AppError> {
    let organisation_id = session.require_managed_organisation()?;
    let controller = FleetController::new(state.pool.clone());
    Ok(Json(controller.create_conducteur(organisation_id, request).await?))
}

async fn list_conducteurs(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<ApiResponse<Vec<Conducteur>>>, AppError> {
    let organisation_id = session.require_managed_organisation()?;
    let controller = FleetController::new(state.pool.clone());
    Ok(Json(ApiResponse::success(controller.list_conducteurs(organisation_id).await?)))
}

async fn assign_vehicule(
    State(state): State<AppState>,
    session: SessionContext,
    Path(conducteur_id): Path<i32>,
    Json(request): Json<AssignVehiculeRequest>,
) -> Result<Json<ApiResponse<Conducteur>>, AppError> {
    let organisation_id = session.require_managed_organisation()?;
    let controller = FleetController::new(state.pool.clone());
    let conducteur = controller
        .assign_vehicule(organisation_id, conducteur_id, request.vehicule_id)
        .await?;
    Ok(Json(ApiResponse::success(conducteur)))
}
