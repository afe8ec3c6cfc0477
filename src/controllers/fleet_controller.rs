use crate::dto::ApiResponse;
use crate::models::fleet::{
    Conducteur, CreateConducteurRequest, CreateMaintenanceRequest, CreateVehiculeRequest,
    MaintenanceRecord, Vehicule, VehiculeStatus,
};
use crate::repositories::fleet_repository::FleetRepository;
use crate::utils::errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

pub struct FleetController {
    repository: FleetRepository,
}

impl FleetController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FleetRepository::new(pool),
        }
    }

    pub async fn create_vehicule(
        &self,
        organisation_id: i32,
        mut request: CreateVehiculeRequest,
    ) -> AppResult<ApiResponse<Vehicule>> {
        request.organisation_id = organisation_id;
        request.immatriculation = request.immatriculation.trim().to_uppercase();
        request.validate()?;

        // La matrícula es única dentro de la organización
        if self
            .repository
            .immatriculation_exists(&request.immatriculation, organisation_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Immatriculation {} already registered for this organisation",
                request.immatriculation
            )));
        }

        let vehicule = self.repository.create_vehicule(&request).await?;
        info!("🚌 Vehículo {} creado para la organización {}", vehicule.immatriculation, organisation_id);

        Ok(ApiResponse::success_with_message(vehicule, "Vehicule created"))
    }

    pub async fn list_vehicules(&self, organisation_id: i32) -> AppResult<Vec<Vehicule>> {
        self.repository.find_vehicules(organisation_id).await
    }

    /// Vehículo de la flota de la organización; uno ajeno se trata como inexistente
    pub async fn find_fleet_vehicule(&self, organisation_id: i32, vehicule_id: i32) -> AppResult<Vehicule> {
        self.repository
            .find_vehicule(vehicule_id)
            .await?
            .filter(|v| v.belongs_to(organisation_id))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Vehicule {} not found in organisation {}",
                    vehicule_id, organisation_id
                ))
            })
    }

    pub async fn set_vehicule_status(&self, id: i32, status: VehiculeStatus) -> AppResult<Vehicule> {
        self.repository.set_vehicule_status(id, status).await
    }

    pub async fn create_conducteur(
        &self,
        organisation_id: i32,
        mut request: CreateConducteurRequest,
    ) -> AppResult<ApiResponse<Conducteur>> {
        request.organisation_id = organisation_id;
        request.validate()?;

        let conducteur = self.repository.create_conducteur(&request).await?;
        Ok(ApiResponse::success_with_message(conducteur, "Conducteur created"))
    }

    pub async fn list_conducteurs(&self, organisation_id: i32) -> AppResult<Vec<Conducteur>> {
        self.repository.find_conducteurs(organisation_id).await
    }

    pub async fn assign_vehicule(
        &self,
        organisation_id: i32,
        conducteur_id: i32,
        vehicule_id: Option<i32>,
    ) -> AppResult<Conducteur> {
        let employed = self
            .repository
            .find_conducteurs(organisation_id)
            .await?
            .iter()
            .any(|c| c.id == conducteur_id);
        if !employed {
            return Err(AppError::NotFound(format!(
                "Conducteur {} not found in organisation {}",
                conducteur_id, organisation_id
            )));
        }

        // El vehículo debe pertenecer a la misma organización
        if let Some(vehicule_id) = vehicule_id {
            let owned = self
                .repository
                .find_vehicule(vehicule_id)
                .await?
                .is_some_and(|v| v.belongs_to(organisation_id));
            if !owned {
                return Err(AppError::Forbidden(format!(
                    "Vehicule {} does not belong to organisation {}",
                    vehicule_id, organisation_id
                )));
            }
        }

        self.repository.assign_vehicule(conducteur_id, vehicule_id).await
    }

    /// Registra un mantenimiento; si inmoviliza el vehículo lo pasa a MAINTENANCE
    pub async fn record_maintenance(
        &self,
        vehicule_id: i32,
        request: CreateMaintenanceRequest,
    ) -> AppResult<ApiResponse<MaintenanceRecord>> {
        request.validate()?;

        let record = self.repository.create_maintenance(vehicule_id, &request).await?;
        if request.immobilise {
            self.repository
                .set_vehicule_status(vehicule_id, VehiculeStatus::Maintenance)
                .await?;
            info!("🔧 Vehículo {} inmovilizado por mantenimiento", vehicule_id);
        }

        Ok(ApiResponse::success_with_message(record, "Maintenance recorded"))
    }

    pub async fn list_maintenance(&self, vehicule_id: i32) -> AppResult<Vec<MaintenanceRecord>> {
        self.repository.find_maintenance(vehicule_id).await
    }
}
