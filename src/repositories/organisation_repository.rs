use crate::models::organisation::{CreateOrganisationRequest, Organisation};
use crate::models::organisation_route::{AssignRouteRequest, OrganisationRoute, ALL_DAYS};
use crate::utils::errors::{db_error, AppResult};
use chrono::Utc;
use sqlx::PgPool;

pub struct OrganisationRepository {
    pool: PgPool,
}

impl OrganisationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateOrganisationRequest) -> AppResult<Organisation> {
        sqlx::query_as::<_, Organisation>(
            r#"
            INSERT INTO organisations (name, email, phone, address, city, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.address)
        .bind(&request.city)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating organisation", e))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Organisation>> {
        sqlx::query_as::<_, Organisation>("SELECT * FROM organisations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Error finding organisation", e))
    }

    pub async fn find_all(&self) -> AppResult<Vec<Organisation>> {
        sqlx::query_as::<_, Organisation>("SELECT * FROM organisations ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Error listing organisations", e))
    }

    pub async fn assign_route(
        &self,
        organisation_id: i32,
        request: &AssignRouteRequest,
    ) -> AppResult<OrganisationRoute> {
        sqlx::query_as::<_, OrganisationRoute>(
            r#"
            INSERT INTO "OrganisationRoute" (
                "organisationId", "routeId", "internalRouteCode", "isActive",
                "assignedVehiculeId", "assignedConducteurId",
                "wifiAvailable", "accessible", "airConditioned", "foodService",
                "customPrice", "customDuration", "departureStationId", "arrivalStationId",
                "weekdaySchedule", "saturdaySchedule", "sundaySchedule", "holidaySchedule",
                "firstDepartureTime", "lastDepartureTime", "operationalDays", "platformInfo"
            )
            VALUES ($1, $2, $3, TRUE, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(organisation_id)
        .bind(request.route_id)
        .bind(&request.internal_route_code)
        .bind(request.assigned_vehicule_id)
        .bind(request.assigned_conducteur_id)
        .bind(request.wifi_available)
        .bind(request.accessible)
        .bind(request.air_conditioned)
        .bind(request.food_service)
        .bind(request.custom_price)
        .bind(request.custom_duration)
        .bind(request.departure_station_id)
        .bind(request.arrival_station_id)
        .bind(&request.weekday_schedule)
        .bind(&request.saturday_schedule)
        .bind(&request.sunday_schedule)
        .bind(&request.holiday_schedule)
        .bind(&request.first_departure_time)
        .bind(&request.last_departure_time)
        .bind(request.operational_days.unwrap_or(ALL_DAYS))
        .bind(&request.platform_info)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error assigning route", e))
    }

    pub async fn find_routes(&self, organisation_id: i32) -> AppResult<Vec<OrganisationRoute>> {
        sqlx::query_as::<_, OrganisationRoute>(
            r#"SELECT * FROM "OrganisationRoute" WHERE "organisationId" = $1 ORDER BY "id""#,
        )
        .bind(organisation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Error listing organisation routes", e))
    }
}
