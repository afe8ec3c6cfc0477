use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::subscription_controller::SubscriptionController;
use crate::dto::subscription_dto::SubscriptionResponse;
use crate::dto::ApiResponse;
use crate::middleware::SessionContext;
use crate::models::payment::{Payment, PaymentRequest};
use crate::models::subscription::CreateSubscriptionRequest;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_subscription_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route("/:id/pay", post(pay_subscription))
}

fn controller(state: &AppState) -> SubscriptionController {
    SubscriptionController::new(state.pool.clone(), state.outbox.clone())
}

async fn create_subscription(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<Json<ApiResponse<SubscriptionResponse>>, AppError> {
    let user = session.require_user()?;
    Ok(Json(controller(&state).create(user.id, request).await?))
}

async fn list_subscriptions(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<Json<ApiResponse<Vec<SubscriptionResponse>>>, AppError> {
    let user = session.require_user()?;
    Ok(Json(ApiResponse::success(controller(&state).list_for_user(user.id).await?)))
}

async fn pay_subscription(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    let user = session.require_user()?;
    Ok(Json(controller(&state).pay(user.id, id, request).await?))
}
