use bcrypt::{hash, verify, DEFAULT_COST};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::models::user::{NewUser, RegisterUserRequest, User};
use crate::repositories::UserRepository;
use crate::services::image_storage::ProfileImageStore;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

/// Servicio de usuarios: registro, verificación de credenciales e imagen de perfil
pub struct UserService {
    users: Arc<dyn UserRepository>,
    images: ProfileImageStore,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, images: ProfileImageStore) -> Self {
        Self {
            users,
            images,
            bcrypt_cost: DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub async fn register(&self, request: RegisterUserRequest) -> AppResult<User> {
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(conflict_error("User", "email", &request.email));
        }

        let password_hash =
            hash(&request.password, self.bcrypt_cost).map_err(|e| AppError::Hash(e.to_string()))?;

        let user = self
            .users
            .create(NewUser {
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                email: request.email.trim().to_lowercase(),
                phone: request.phone,
                password_hash,
                role: request.role,
                organisation_id: request.organisation_id,
            })
            .await?;

        info!("👤 Usuario {} registrado ({})", user.id, user.role);
        Ok(user)
    }

    /// Verifica email y contraseña. El mismo error para email desconocido
    /// y contraseña incorrecta.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self.users.find_by_email(email.trim()).await?.ok_or_else(invalid)?;
        let matches =
            verify(password, &user.password_hash).map_err(|e| AppError::Hash(e.to_string()))?;

        if !matches {
            warn!("🔒 Contraseña incorrecta para el usuario {}", user.id);
            return Err(invalid());
        }
        Ok(user)
    }

    pub async fn get(&self, id: i32) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("User", id))
    }

    /// Guarda la nueva imagen, la asocia al usuario y borra la anterior
    pub async fn set_profile_image(&self, user_id: i32, original_name: &str, bytes: &[u8]) -> AppResult<User> {
        let current = self.get(user_id).await?;
        let filename = self.images.save(original_name, bytes).await?;
        let user = self.users.set_profile_image(user_id, &filename).await?;

        if let Some(previous) = current.profile_image.filter(|p| *p != filename) {
            if let Err(e) = self.images.remove(&previous).await {
                warn!("⚠️ No se pudo borrar la imagen anterior {}: {}", previous, e);
            }
        }
        Ok(user)
    }
}
