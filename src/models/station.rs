//! Modelo de Station
//!
//! Estaciones y paradas. Las coordenadas pueden venir explícitas en la
//! petición o resolverse por ciudad (ver `services::station_service`).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Station principal - mapea a la tabla stations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Station {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub station_type: String,
    pub organisation_id: Option<i32>,
    pub station_code: String,
    pub opening_hours: Option<String>,
}

/// Request para crear una estación
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStationRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 2, max = 100))]
    pub city: String,

    #[validate(length(max = 255))]
    pub address: String,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    #[validate(length(min = 2, max = 50))]
    pub station_type: String,

    pub organisation_id: Option<i32>,

    #[validate(custom = "crate::utils::validation::validate_station_code")]
    pub station_code: String,

    #[validate(length(max = 100))]
    pub opening_hours: Option<String>,
}

impl CreateStationRequest {
    /// Coordenadas explícitas, sólo si vienen las dos
    pub fn explicit_coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    pub fn into_station(self, id: i32, latitude: f64, longitude: f64) -> Station {
        Station {
            id,
            name: self.name,
            city: self.city,
            address: self.address,
            latitude,
            longitude,
            station_type: self.station_type,
            organisation_id: self.organisation_id,
            station_code: self.station_code,
            opening_hours: self.opening_hours,
        }
    }
}
