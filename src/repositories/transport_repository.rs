use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::transport::{NewTransport, Transport};
use crate::utils::errors::{db_error, not_found_error, AppResult};

/// Acceso a la tabla transports
#[async_trait]
pub trait TransportRepository: Send + Sync {
    async fn create(&self, transport: NewTransport) -> AppResult<Transport>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Transport>>;
    async fn find_by_company(&self, company_id: i32) -> AppResult<Vec<Transport>>;
    async fn set_available(&self, id: i32, available: bool) -> AppResult<Transport>;
}

pub struct PgTransportRepository {
    pool: PgPool,
}

impl PgTransportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransportRepository for PgTransportRepository {
    async fn create(&self, transport: NewTransport) -> AppResult<Transport> {
        sqlx::query_as::<_, Transport>(
            r#"
            INSERT INTO transports (name, transport_type, capacity, company_id, license_plate, available)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&transport.name)
        .bind(&transport.transport_type)
        .bind(transport.capacity)
        .bind(transport.company_id)
        .bind(&transport.license_plate)
        .bind(transport.available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating transport", e))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Transport>> {
        sqlx::query_as::<_, Transport>("SELECT * FROM transports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Error finding transport", e))
    }

    async fn find_by_company(&self, company_id: i32) -> AppResult<Vec<Transport>> {
        sqlx::query_as::<_, Transport>(
            "SELECT * FROM transports WHERE company_id = $1 ORDER BY name",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Error listing transports", e))
    }

    async fn set_available(&self, id: i32, available: bool) -> AppResult<Transport> {
        sqlx::query_as::<_, Transport>(
            "UPDATE transports SET available = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(available)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Error updating transport", e))?
        .ok_or_else(|| not_found_error("Transport", id))
    }
}
