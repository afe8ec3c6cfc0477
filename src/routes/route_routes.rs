use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::dto::ApiResponse;
use crate::middleware::SessionContext;
use crate::models::route::{NewRoute, Route, RouteFilters};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_routes).post(create_route))
        .route("/:id", get(get_route))
}

async fn search_routes(
    State(state): State<AppState>,
    Query(filters): Query<RouteFilters>,
) -> Result<Json<ApiResponse<Vec<Route>>>, AppError> {
    let routes = state.routes.search(&filters).await?;
    Ok(Json(ApiResponse::success(routes)))
}

async fn create_route(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<NewRoute>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    session.require_staff()?;
    let route = state.routes.create(request).await?;
    Ok(Json(ApiResponse::success_with_message(route, "Route created")))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    let route = state
        .routes
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Route", id))?;
    Ok(Json(ApiResponse::success(route)))
}
