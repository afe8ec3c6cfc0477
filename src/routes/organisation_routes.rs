use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::organisation_controller::OrganisationController;
use crate::dto::organisation_dto::OrganisationRouteResponse;
use crate::dto::ApiResponse;
use crate::middleware::SessionContext;
use crate::models::organisation::{CreateOrganisationRequest, Organisation};
use crate::models::organisation_route::AssignRouteRequest;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_organisation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organisations).post(create_organisation))
        .route("/:id", get(get_organisation))
        .route("/:id/routes", get(list_routes).post(assign_route))
}

fn controller(state: &AppState) -> OrganisationController {
    OrganisationController::new(state.pool.clone(), state.routes.clone())
}

async fn create_organisation(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<CreateOrganisationRequest>,
) -> Result<Json<ApiResponse<Organisation>>, AppError> {
    session.require_admin()?;
    Ok(Json(controller(&state).create(request).await?))
}

async fn list_organisations(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Organisation>>>, AppError> {
    Ok(Json(ApiResponse::success(controller(&state).list().await?)))
}

async fn get_organisation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Organisation>>, AppError> {
    Ok(Json(ApiResponse::success(controller(&state).get(id).await?)))
}

async fn assign_route(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
    Json(request): Json<AssignRouteRequest>,
) -> Result<Json<ApiResponse<OrganisationRouteResponse>>, AppError> {
    session.require_organisation_access(id)?;
    Ok(Json(controller(&state).assign_route(id, request).await?))
}

async fn list_routes(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<OrganisationRouteResponse>>>, AppError> {
    session.require_organisation_access(id)?;
    Ok(Json(ApiResponse::success(controller(&state).list_routes(id).await?)))
}
