//! Modelo de OrganisationRoute
//!
//! Asignación de una ruta del catálogo a una organización, con sus
//! servicios a bordo, precio/duración propios y horarios. La tabla
//! conserva identificadores camelCase entre comillas (`"OrganisationRoute"`),
//! de ahí el `rename_all`.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::route::Route;

/// Todos los días activos (lunes = bit 0 ... domingo = bit 6)
pub const ALL_DAYS: i32 = 0b111_1111;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct OrganisationRoute {
    pub id: i32,
    pub organisation_id: i32,
    pub route_id: i32,
    pub internal_route_code: Option<String>,
    pub is_active: bool,
    pub assigned_vehicule_id: Option<i32>,
    pub assigned_conducteur_id: Option<i32>,
    /// Columna heredada; la duración efectiva sale de `custom_duration`
    pub route_duration: i32,
    pub wifi_available: bool,
    pub accessible: bool,
    pub air_conditioned: bool,
    pub food_service: bool,
    pub custom_price: Option<f64>,
    pub custom_duration: Option<i32>,
    pub route_price: f64,
    pub departure_station_id: Option<i32>,
    pub arrival_station_id: Option<i32>,
    pub weekday_schedule: Option<String>,
    pub saturday_schedule: Option<String>,
    pub sunday_schedule: Option<String>,
    pub holiday_schedule: Option<String>,
    pub first_departure_time: Option<String>,
    pub last_departure_time: Option<String>,
    pub operational_days: i32,
    pub platform_info: Option<String>,
}

impl OrganisationRoute {
    /// Precio aplicado: personalizado, si no el de la asignación, si no el base
    pub fn effective_price(&self, route: &Route) -> f64 {
        self.custom_price
            .or_else(|| (self.route_price > 0.0).then_some(self.route_price))
            .unwrap_or(route.base_price)
    }

    /// Duración aplicada en minutos
    pub fn effective_duration(&self, route: &Route) -> i32 {
        self.custom_duration.unwrap_or(route.estimated_duration)
    }

    pub fn operates_on(&self, day: Weekday) -> bool {
        operates_on(self.operational_days, day)
    }
}

pub fn operates_on(mask: i32, day: Weekday) -> bool {
    mask & (1 << day.num_days_from_monday()) != 0
}

/// Construye la máscara de días a partir de una lista
pub fn days_mask(days: &[Weekday]) -> i32 {
    days.iter()
        .fold(0, |mask, day| mask | (1 << day.num_days_from_monday()))
}

/// Request para asignar una ruta a una organización
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignRouteRequest {
    pub route_id: i32,

    #[validate(length(max = 50))]
    pub internal_route_code: Option<String>,

    pub assigned_vehicule_id: Option<i32>,
    pub assigned_conducteur_id: Option<i32>,

    #[serde(default)]
    pub wifi_available: bool,
    #[serde(default)]
    pub accessible: bool,
    #[serde(default)]
    pub air_conditioned: bool,
    #[serde(default)]
    pub food_service: bool,

    #[validate(range(min = 0.0))]
    pub custom_price: Option<f64>,

    #[validate(range(min = 0))]
    pub custom_duration: Option<i32>,

    pub departure_station_id: Option<i32>,
    pub arrival_station_id: Option<i32>,

    #[validate(length(max = 50))]
    pub weekday_schedule: Option<String>,
    #[validate(length(max = 50))]
    pub saturday_schedule: Option<String>,
    #[validate(length(max = 50))]
    pub sunday_schedule: Option<String>,
    #[validate(length(max = 50))]
    pub holiday_schedule: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_departure_time")]
    pub first_departure_time: Option<String>,
    #[validate(custom = "crate::utils::validation::validate_departure_time")]
    pub last_departure_time: Option<String>,

    #[validate(range(min = 0, max = 127))]
    pub operational_days: Option<i32>,

    #[validate(length(max = 100))]
    pub platform_info: Option<String>,
}
