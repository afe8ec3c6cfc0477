use crate::models::station::Station;
use crate::utils::errors::{db_error, AppResult};
use sqlx::PgPool;

pub struct StationRepository {
    pool: PgPool,
}

impl StationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta la estación ignorando su `id`
    pub async fn create(&self, station: &Station) -> AppResult<Station> {
        sqlx::query_as::<_, Station>(
            r#"
            INSERT INTO stations (name, city, address, latitude, longitude, station_type,
                                  organisation_id, station_code, opening_hours)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&station.name)
        .bind(&station.city)
        .bind(&station.address)
        .bind(station.latitude)
        .bind(station.longitude)
        .bind(&station.station_type)
        .bind(station.organisation_id)
        .bind(&station.station_code)
        .bind(&station.opening_hours)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating station", e))
    }

    pub async fn find_by_city(&self, city: &str) -> AppResult<Vec<Station>> {
        sqlx::query_as::<_, Station>(
            "SELECT * FROM stations WHERE city ILIKE $1 ORDER BY name",
        )
        .bind(city.trim())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Error listing stations", e))
    }

    pub async fn find_all(&self) -> AppResult<Vec<Station>> {
        sqlx::query_as::<_, Station>("SELECT * FROM stations ORDER BY city, name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Error listing stations", e))
    }
}
