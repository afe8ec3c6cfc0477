use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::dto::ApiResponse;
use crate::middleware::SessionContext;
use crate::models::reservation::{ConfirmRequest, NewReservation, Reservation, StatusChangeRequest};
use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Deserialize)]
struct ListQuery {
    user_id: Option<i32>,
}

pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/:id", get(get_reservation).put(update_reservation))
        .route("/:id/confirm", post(confirm_reservation))
        .route("/:id/cancel", post(cancel_reservation))
        .route("/:id/status", post(change_status))
}

/// Un cliente sólo ve sus propias reservas
fn ensure_owner(session: &SessionContext, reservation: &Reservation) -> Result<(), AppError> {
    let user = session.require_user()?;
    if user.role == UserRole::Client && user.id != reservation.user_id {
        return Err(AppError::Forbidden(format!(
            "Reservation {} belongs to another user",
            reservation.id
        )));
    }
    Ok(())
}

async fn create_reservation(
    State(state): State<AppState>,
    session: SessionContext,
    Json(mut request): Json<NewReservation>,
) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    request.user_id = session.require_user()?.id;
    let reservation = state.reservation_service.create(request).await?;
    Ok(Json(ApiResponse::success_with_message(reservation, "Reservation created")))
}

/// Sin `user_id` lista las reservas del usuario de la sesión
async fn list_reservations(
    State(state): State<AppState>,
    session: SessionContext,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Reservation>>>, AppError> {
    let user = session.require_user()?;
    let user_id = query.user_id.unwrap_or(user.id);
    if user.role == UserRole::Client && user.id != user_id {
        return Err(AppError::Forbidden("Cannot list another user's reservations".to_string()));
    }
    let reservations = state.reservation_service.list_for_user(user_id).await?;
    Ok(Json(ApiResponse::success(reservations)))
}

async fn get_reservation(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    let reservation = state.reservation_service.get(id).await?;
    ensure_owner(&session, &reservation)?;
    Ok(Json(ApiResponse::success(reservation)))
}

async fn update_reservation(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
    Json(mut reservation): Json<Reservation>,
) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    let current = state.reservation_service.get(id).await?;
    ensure_owner(&session, &current)?;
    // Un cliente sólo cambia los datos del viaje, no el estado ni el pago
    if session.require_user()?.role == UserRole::Client {
        reservation.status = current.status;
        reservation.is_paid = current.is_paid;
    }
    reservation.id = id;
    let updated = state.reservation_service.update(reservation).await?;
    Ok(Json(ApiResponse::success_with_message(updated, "Reservation updated")))
}

async fn confirm_reservation(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    ensure_owner(&session, &state.reservation_service.get(id).await?)?;
    // Marcar como pagada es cosa del personal
    if request.is_paid {
        session.require_staff()?;
    }
    let reservation = state.reservation_service.confirm(id, request.is_paid).await?;
    Ok(Json(ApiResponse::success_with_message(reservation, "Reservation confirmed")))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    ensure_owner(&session, &state.reservation_service.get(id).await?)?;
    let reservation = state.reservation_service.cancel(id).await?;
    Ok(Json(ApiResponse::success_with_message(reservation, "Reservation canceled")))
}

async fn change_status(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    session.require_staff()?;
    let reservation = state.reservation_service.transition(id, request.status).await?;
    Ok(Json(ApiResponse::success(reservation)))
}
