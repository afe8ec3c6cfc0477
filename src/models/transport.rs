//! Modelo de Transport
//!
//! Instancia concreta (vehículo o servicio) que opera una ruta.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Transport principal - mapea a la tabla transports
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Transport {
    pub id: i32,
    pub name: String,
    pub transport_type: String,
    pub capacity: i32,
    pub company_id: i32,
    pub license_plate: String,
    pub available: bool,
}

/// Request para crear un transporte
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTransport {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 2, max = 50))]
    pub transport_type: String,

    #[validate(range(min = 1))]
    pub capacity: i32,

    pub company_id: i32,

    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub license_plate: String,

    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Request para cambiar la disponibilidad
#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}
