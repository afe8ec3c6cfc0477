//! Modelos de flota: Vehicule, Conducteur y registros de mantenimiento
//!
//! Mapean a las tablas vehicules, conducteurs y maintenance_records.
//! Las relaciones son enteros sueltos (organisation_id, vehicule_id).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use super::ParseEnumError;

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehiculeStatus {
    #[default]
    Active,
    Maintenance,
    OutOfService,
}

impl VehiculeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehiculeStatus::Active => "ACTIVE",
            VehiculeStatus::Maintenance => "MAINTENANCE",
            VehiculeStatus::OutOfService => "OUT_OF_SERVICE",
        }
    }
}

impl fmt::Display for VehiculeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehiculeStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(VehiculeStatus::Active),
            "MAINTENANCE" => Ok(VehiculeStatus::Maintenance),
            "OUT_OF_SERVICE" => Ok(VehiculeStatus::OutOfService),
            _ => Err(ParseEnumError::new("VehiculeStatus", s)),
        }
    }
}

impl TryFrom<String> for VehiculeStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Vehicule {
    pub id: i32,
    pub organisation_id: i32,
    pub immatriculation: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub capacity: i32,
    pub vehicule_type: String,
    #[sqlx(try_from = "String")]
    pub status: VehiculeStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehiculeRequest {
    // Se toma de la sesión
    #[serde(default)]
    pub organisation_id: i32,

    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub immatriculation: String,

    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1, max = 500))]
    pub capacity: i32,

    #[validate(length(min = 2, max = 50))]
    pub vehicule_type: String,
}

impl Vehicule {
    pub fn belongs_to(&self, organisation_id: i32) -> bool {
        self.organisation_id == organisation_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Conducteur {
    pub id: i32,
    pub organisation_id: i32,
    pub vehicule_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub licence_number: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateConducteurRequest {
    #[serde(default)]
    pub organisation_id: i32,
    pub vehicule_id: Option<i32>,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 5, max = 30))]
    pub licence_number: String,

    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VehiculeStatusRequest {
    pub status: VehiculeStatus,
}

/// Request para asignar (o liberar) el vehículo de un conductor
#[derive(Debug, Deserialize)]
pub struct AssignVehiculeRequest {
    pub vehicule_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MaintenanceRecord {
    pub id: i32,
    pub vehicule_id: i32,
    pub description: String,
    pub cost: Decimal,
    pub maintenance_date: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_maintenance"))]
pub struct CreateMaintenanceRequest {
    #[validate(length(min = 3, max = 500))]
    pub description: String,

    pub cost: Decimal,
    pub maintenance_date: NaiveDate,
    pub next_due_date: Option<NaiveDate>,

    /// Poner el vehículo en mantenimiento al registrar la intervención
    #[serde(default)]
    pub immobilise: bool,
}

fn validate_maintenance(request: &CreateMaintenanceRequest) -> Result<(), ValidationError> {
    if request.cost.is_sign_negative() {
        return Err(ValidationError::new("negative_cost"));
    }
    if let Some(next) = request.next_due_date {
        crate::utils::validation::validate_date_range(request.maintenance_date, next)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicule_ownership() {
        let vehicule = Vehicule {
            id: 4,
            organisation_id: 2,
            immatriculation: "123 TU 4567".to_string(),
            brand: None,
            model: None,
            capacity: 50,
            vehicule_type: "Bus".to_string(),
            status: VehiculeStatus::Active,
        };
        assert!(vehicule.belongs_to(2));
        assert!(!vehicule.belongs_to(3));
    }

    #[test]
    fn test_vehicule_status_parsing() {
        assert_eq!("out_of_service".parse::<VehiculeStatus>().unwrap(), VehiculeStatus::OutOfService);
        assert_eq!(
            serde_json::to_string(&VehiculeStatus::OutOfService).unwrap(),
            "\"OUT_OF_SERVICE\""
        );
        assert!("BROKEN".parse::<VehiculeStatus>().is_err());
    }

    #[test]
    fn test_maintenance_next_due_not_before_date() {
        let request = CreateMaintenanceRequest {
            description: "Vidange et filtres".to_string(),
            cost: Decimal::new(25000, 2),
            maintenance_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            next_due_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            immobilise: false,
        };
        assert!(request.validate().is_err());

        let request = CreateMaintenanceRequest {
            next_due_date: NaiveDate::from_ymd_opt(2025, 9, 10),
            ..request
        };
        assert!(request.validate().is_ok());
    }
}
