use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::middleware::SessionContext;
use crate::models::transport::{AvailabilityRequest, NewTransport, Transport};
use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Deserialize)]
struct CompanyQuery {
    company_id: i32,
}

pub fn create_transport_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_by_company).post(create_transport))
        .route("/:id/availability", put(set_availability))
}

async fn create_transport(
    State(state): State<AppState>,
    session: SessionContext,
    Json(mut request): Json<NewTransport>,
) -> Result<Json<ApiResponse<Transport>>, AppError> {
    session.require_staff()?;
    request.license_plate = request.license_plate.trim().to_uppercase();
    request.validate()?;
    let transport = state.transports.create(request).await?;
    Ok(Json(ApiResponse::success_with_message(transport, "Transport created")))
}

async fn list_by_company(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<ApiResponse<Vec<Transport>>>, AppError> {
    let transports = state.transports.find_by_company(query.company_id).await?;
    Ok(Json(ApiResponse::success(transports)))
}

async fn set_availability(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
    Json(request): Json<AvailabilityRequest>,
) -> Result<Json<ApiResponse<Transport>>, AppError> {
    session.require_staff()?;
    let transport = state.transports.set_available(id, request.available).await?;
    Ok(Json(ApiResponse::success(transport)))
}
