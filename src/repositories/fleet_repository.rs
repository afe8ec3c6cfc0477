use crate::models::fleet::{
    Conducteur, CreateConducteurRequest, CreateMaintenanceRequest, CreateVehiculeRequest,
    MaintenanceRecord, Vehicule, VehiculeStatus,
};
use crate::utils::errors::{db_error, not_found_error, AppResult};
use sqlx::PgPool;

/// Vehículos, conductores y mantenimiento de una organización
pub struct FleetRepository {
    pool: PgPool,
}

impl FleetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_vehicule(&self, request: &CreateVehiculeRequest) -> AppResult<Vehicule> {
        sqlx::query_as::<_, Vehicule>(
            r#"
            INSERT INTO vehicules (organisation_id, immatriculation, brand, model, capacity, vehicule_type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.organisation_id)
        .bind(&request.immatriculation)
        .bind(&request.brand)
        .bind(&request.model)
        .bind(request.capacity)
        .bind(&request.vehicule_type)
        .bind(VehiculeStatus::Active.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating vehicule", e))
    }

    pub async fn immatriculation_exists(&self, immatriculation: &str, organisation_id: i32) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicules WHERE immatriculation = $1 AND organisation_id = $2)",
        )
        .bind(immatriculation)
        .bind(organisation_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error checking immatriculation", e))?;

        Ok(result.0)
    }

    pub async fn find_vehicules(&self, organisation_id: i32) -> AppResult<Vec<Vehicule>> {
        sqlx::query_as::<_, Vehicule>(
            "SELECT * FROM vehicules WHERE organisation_id = $1 ORDER BY immatriculation",
        )
        .bind(organisation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Error listing vehicules", e))
    }

    pub async fn find_vehicule(&self, id: i32) -> AppResult<Option<Vehicule>> {
        sqlx::query_as::<_, Vehicule>("SELECT * FROM vehicules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Error finding vehicule", e))
    }

    pub async fn set_vehicule_status(&self, id: i32, status: VehiculeStatus) -> AppResult<Vehicule> {
        sqlx::query_as::<_, Vehicule>("UPDATE vehicules SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Error updating vehicule status", e))?
            .ok_or_else(|| not_found_error("Vehicule", id))
    }

    pub async fn create_conducteur(&self, request: &CreateConducteurRequest) -> AppResult<Conducteur> {
        sqlx::query_as::<_, Conducteur>(
            r#"
            INSERT INTO conducteurs (organisation_id, vehicule_id, first_name, last_name,
                                     licence_number, phone, email, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            RETURNING *
            "#,
        )
        .bind(request.organisation_id)
        .bind(request.vehicule_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.licence_number)
        .bind(&request.phone)
        .bind(&request.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating conducteur", e))
    }

    pub async fn find_conducteurs(&self, organisation_id: i32) -> AppResult<Vec<Conducteur>> {
        sqlx::query_as::<_, Conducteur>(
            "SELECT * FROM conducteurs WHERE organisation_id = $1 ORDER BY last_name, first_name",
        )
        .bind(organisation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Error listing conducteurs", e))
    }

    pub async fn assign_vehicule(&self, conducteur_id: i32, vehicule_id: Option<i32>) -> AppResult<Conducteur> {
        sqlx::query_as::<_, Conducteur>(
            "UPDATE conducteurs SET vehicule_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(conducteur_id)
        .bind(vehicule_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Error assigning vehicule", e))?
        .ok_or_else(|| not_found_error("Conducteur", conducteur_id))
    }

    pub async fn create_maintenance(
        &self,
        vehicule_id: i32,
        request: &CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRecord> {
        sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (vehicule_id, description, cost, maintenance_date, next_due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(vehicule_id)
        .bind(&request.description)
        .bind(request.cost)
        .bind(request.maintenance_date)
        .bind(request.next_due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating maintenance record", e))
    }

    pub async fn find_maintenance(&self, vehicule_id: i32) -> AppResult<Vec<MaintenanceRecord>> {
        sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT * FROM maintenance_records WHERE vehicule_id = $1 ORDER BY maintenance_date DESC",
        )
        .bind(vehicule_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Error listing maintenance records", e))
    }
}
