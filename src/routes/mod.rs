//! Rutas HTTP
//!
//! Cada módulo expone un `Router<AppState>` que se anida bajo `/api`.

pub mod fleet_routes;
pub mod organisation_routes;
pub mod reservation_routes;
pub mod route_routes;
pub mod station_routes;
pub mod subscription_routes;
pub mod transport_routes;
pub mod user_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/routes", route_routes::create_route_router())
        .nest("/api/reservations", reservation_routes::create_reservation_router())
        .nest("/api/stations", station_routes::create_station_router())
        .nest("/api/organisations", organisation_routes::create_organisation_router())
        .nest("/api/transports", transport_routes::create_transport_router())
        .nest("/api/fleet", fleet_routes::create_fleet_router())
        .nest("/api/subscriptions", subscription_routes::create_subscription_router())
        .nest("/api/users", user_routes::create_user_router())
        .nest("/api/auth", user_routes::create_auth_router())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
