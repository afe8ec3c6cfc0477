//! Modelo de Route
//!
//! Este módulo contiene el struct Route, el modo de transporte y la
//! variante de creación. Mapea a la tabla `routes`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::ParseEnumError;

/// Modo de transporte de una ruta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Bus,
    Train,
    #[serde(rename = "Métro")]
    Metro,
    #[serde(rename = "TGM")]
    Tgm,
    Tram,
    Taxi,
    Ferry,
    Avion,
}

impl TransportMode {
    pub const ALL: [TransportMode; 8] = [
        TransportMode::Bus,
        TransportMode::Train,
        TransportMode::Metro,
        TransportMode::Tgm,
        TransportMode::Tram,
        TransportMode::Taxi,
        TransportMode::Ferry,
        TransportMode::Avion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Bus => "Bus",
            TransportMode::Train => "Train",
            TransportMode::Metro => "Métro",
            TransportMode::Tgm => "TGM",
            TransportMode::Tram => "Tram",
            TransportMode::Taxi => "Taxi",
            TransportMode::Ferry => "Ferry",
            TransportMode::Avion => "Avion",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bus" => Ok(TransportMode::Bus),
            "train" => Ok(TransportMode::Train),
            "métro" | "metro" => Ok(TransportMode::Metro),
            "tgm" => Ok(TransportMode::Tgm),
            "tram" => Ok(TransportMode::Tram),
            "taxi" => Ok(TransportMode::Taxi),
            "ferry" => Ok(TransportMode::Ferry),
            "avion" => Ok(TransportMode::Avion),
            _ => Err(ParseEnumError::new("TransportMode", s)),
        }
    }
}

impl TryFrom<String> for TransportMode {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Route principal - mapea a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Route {
    pub id: i32,
    pub origin: String,
    pub destination: String,
    pub distance: f64,
    pub estimated_duration: i32,
    pub base_price: f64,
    pub company_id: i32,
    #[sqlx(try_from = "String")]
    pub transport_mode: TransportMode,
    pub is_international: bool,
    pub is_intra_city: bool,
}

/// Datos para crear una nueva ruta
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct NewRoute {
    #[validate(length(min = 2, max = 100))]
    pub origin: String,

    #[validate(length(min = 2, max = 100))]
    pub destination: String,

    #[validate(range(min = 0.0))]
    pub distance: f64,

    #[validate(range(min = 0))]
    pub estimated_duration: i32,

    #[validate(range(min = 0.0))]
    pub base_price: f64,

    pub company_id: i32,
    pub transport_mode: TransportMode,
    pub is_international: bool,
    pub is_intra_city: bool,
}

impl NewRoute {
    /// Validación completa: rangos del derive más origen ≠ destino
    pub fn check(&self) -> crate::utils::errors::AppResult<()> {
        self.validate()?;
        if self.origin.trim().eq_ignore_ascii_case(self.destination.trim()) {
            return Err(crate::utils::errors::AppError::ValidationError(format!(
                "Origin and destination must differ ('{}')",
                self.origin
            )));
        }
        Ok(())
    }

    pub fn into_route(self, id: i32) -> Route {
        Route {
            id,
            origin: self.origin,
            destination: self.destination,
            distance: self.distance,
            estimated_duration: self.estimated_duration,
            base_price: self.base_price,
            company_id: self.company_id,
            transport_mode: self.transport_mode,
            is_international: self.is_international,
            is_intra_city: self.is_intra_city,
        }
    }
}

/// Filtros para búsqueda de rutas
#[derive(Debug, Default, Deserialize)]
pub struct RouteFilters {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub transport_mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewRoute {
        NewRoute {
            origin: "Tunis".to_string(),
            destination: "Sousse".to_string(),
            distance: 140.0,
            estimated_duration: 120,
            base_price: 12.5,
            company_id: 1,
            transport_mode: TransportMode::Train,
            is_international: false,
            is_intra_city: false,
        }
    }

    #[test]
    fn test_transport_mode_parsing() {
        assert_eq!("Métro".parse::<TransportMode>().unwrap(), TransportMode::Metro);
        assert_eq!("metro".parse::<TransportMode>().unwrap(), TransportMode::Metro);
        assert_eq!("TGM".parse::<TransportMode>().unwrap(), TransportMode::Tgm);
        assert_eq!("tram".parse::<TransportMode>().unwrap(), TransportMode::Tram);
        assert!("Hélicoptère".parse::<TransportMode>().is_err());
        for mode in TransportMode::ALL {
            assert_eq!(mode.as_str().parse::<TransportMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_transport_mode_serde_names() {
        let json = serde_json::to_string(&TransportMode::Metro).unwrap();
        assert_eq!(json, "\"Métro\"");
    }

    #[test]
    fn test_check_rejects_same_origin_and_destination() {
        let mut route = sample();
        assert!(route.check().is_ok());
        route.destination = " tunis ".to_string();
        assert!(route.check().is_err());
    }

    #[test]
    fn test_check_rejects_negative_price() {
        let mut route = sample();
        route.base_price = -1.0;
        assert!(route.check().is_err());
    }
}
