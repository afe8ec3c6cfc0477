use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::user::{NewUser, User};
use crate::utils::errors::{db_error, not_found_error, AppResult};

/// Acceso a la tabla users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> AppResult<User>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn set_profile_image(&self, id: i32, filename: &str) -> AppResult<User>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, phone, password_hash, role, organisation_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.to_lowercase())
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.organisation_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating user", e))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Error finding user", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Error finding user by email", e))
    }

    async fn set_profile_image(&self, id: i32, filename: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET profile_image = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(filename)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Error updating profile image", e))?
        .ok_or_else(|| not_found_error("User", id))
    }
}
