use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::dto::ApiResponse;
use crate::middleware::SessionContext;
use crate::models::station::{CreateStationRequest, Station};
use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Deserialize)]
struct StationQuery {
    city: Option<String>,
}

pub fn create_station_router() -> Router<AppState> {
    Router::new().route("/", get(list_stations).post(create_station))
}

async fn create_station(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<CreateStationRequest>,
) -> Result<Json<ApiResponse<Station>>, AppError> {
    session.require_staff()?;
    let station = state.station_service.create(request).await?;
    Ok(Json(ApiResponse::success_with_message(station, "Station created")))
}

async fn list_stations(
    State(state): State<AppState>,
    Query(query): Query<StationQuery>,
) -> Result<Json<ApiResponse<Vec<Station>>>, AppError> {
    let stations = state.station_service.list(query.city.as_deref()).await?;
    Ok(Json(ApiResponse::success(stations)))
}
