use chrono::Weekday;
use serde::Serialize;

use crate::models::organisation_route::OrganisationRoute;
use crate::models::route::Route;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// Ruta de organización con los valores ya resueltos contra la ruta base
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationRouteResponse {
    #[serde(flatten)]
    pub assignment: OrganisationRoute,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub effective_price: Option<f64>,
    pub effective_duration: Option<i32>,
    pub operating_days: Vec<String>,
}

impl OrganisationRouteResponse {
    /// `route` es `None` cuando la ruta base ya no existe
    pub fn new(assignment: OrganisationRoute, route: Option<&Route>) -> Self {
        let operating_days = WEEK
            .iter()
            .filter(|day| assignment.operates_on(**day))
            .map(|day| day.to_string())
            .collect();

        Self {
            origin: route.map(|r| r.origin.clone()),
            destination: route.map(|r| r.destination.clone()),
            effective_price: route.map(|r| assignment.effective_price(r)),
            effective_duration: route.map(|r| assignment.effective_duration(r)),
            operating_days,
            assignment,
        }
    }
}
