use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::route::{NewRoute, Route, RouteFilters, TransportMode};
use crate::utils::errors::{db_error, AppError, AppResult};

/// Acceso a la tabla routes
#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn create(&self, route: NewRoute) -> AppResult<Route>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Route>>;
    async fn count(&self) -> AppResult<i64>;
    async fn search(&self, filters: &RouteFilters) -> AppResult<Vec<Route>>;
}

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn create(&self, route: NewRoute) -> AppResult<Route> {
        route.check()?;

        sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (origin, destination, distance, estimated_duration, base_price,
                                company_id, transport_mode, is_international, is_intra_city)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&route.origin)
        .bind(&route.destination)
        .bind(route.distance)
        .bind(route.estimated_duration)
        .bind(route.base_price)
        .bind(route.company_id)
        .bind(route.transport_mode.as_str())
        .bind(route.is_international)
        .bind(route.is_intra_city)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating route", e))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Route>> {
        sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Error finding route", e))
    }

    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM routes")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Error counting routes", e))?;

        Ok(result.0)
    }

    async fn search(&self, filters: &RouteFilters) -> AppResult<Vec<Route>> {
        let mode = filters
            .transport_mode
            .as_deref()
            .map(|m| m.parse::<TransportMode>())
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        sqlx::query_as::<_, Route>(
            r#"
            SELECT * FROM routes
            WHERE ($1::text IS NULL OR origin ILIKE $1)
              AND ($2::text IS NULL OR destination ILIKE $2)
              AND ($3::text IS NULL OR transport_mode = $3)
            ORDER BY origin, destination, id
            "#,
        )
        .bind(filters.origin.as_ref().map(|o| format!("%{}%", o.trim())))
        .bind(filters.destination.as_ref().map(|d| format!("%{}%", d.trim())))
        .bind(mode.map(|m| m.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Error searching routes", e))
    }
}
