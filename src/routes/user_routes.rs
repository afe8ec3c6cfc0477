use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::dto::ApiResponse;
use crate::middleware::SessionContext;
use crate::models::user::{RegisterUserRequest, User, UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    token_type: &'static str,
    expires_in: u64,
    user: User,
}

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/:id", get(get_user))
        .route("/:id/profile-image", post(upload_profile_image))
}

pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

fn ensure_self_or_admin(session: &SessionContext, user_id: i32) -> Result<(), AppError> {
    let user = session.require_user()?;
    if user.id != user_id && user.role != UserRole::Admin {
        return Err(AppError::Forbidden(format!("No access to user {}", user_id)));
    }
    Ok(())
}

/// El registro público crea clientes; otros roles sólo los crea un admin
async fn register(
    State(state): State<AppState>,
    session: SessionContext,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    if request.role != UserRole::Client {
        session.require_admin()?;
    }
    let user = state.user_service.register(request).await?;
    Ok(Json(ApiResponse::success_with_message(user, "User registered")))
}

/// Credenciales correctas -> token Bearer firmado
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?;
    let token = state.jwt.generate_token(&user)?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt.ttl().as_secs(),
        user,
    })))
}

async fn get_user(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    ensure_self_or_admin(&session, id)?;
    Ok(Json(ApiResponse::success(state.user_service.get(id).await?)))
}

/// Multipart con un campo `image`
async fn upload_profile_image(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<User>>, AppError> {
    ensure_self_or_admin(&session, id)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid upload: {}", e)))?;

        let user = state.user_service.set_profile_image(id, &filename, &bytes).await?;
        return Ok(Json(ApiResponse::success_with_message(user, "Profile image updated")));
    }

    Err(AppError::BadRequest("Missing 'image' field".to_string()))
}
