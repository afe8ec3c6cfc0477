//! Modelo de Reservation
//!
//! Reserva de un usuario sobre una ruta y un transporte, con su máquina
//! de estados:
//!
//! ```text
//! PENDING   -> CONFIRMED | REJECTED | CANCELED
//! CONFIRMED -> COMPLETED | CANCELED
//! ```
//!
//! COMPLETED, REJECTED y CANCELED son terminales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;
use crate::utils::errors::{AppError, AppResult};

/// Estado de la reserva
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Canceled,
    Completed,
    Rejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Canceled => "CANCELED",
            ReservationStatus::Completed => "COMPLETED",
            ReservationStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Canceled | ReservationStatus::Completed | ReservationStatus::Rejected
        )
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Rejected)
                | (Pending, Canceled)
                | (Confirmed, Completed)
                | (Confirmed, Canceled)
        )
    }

    /// Devuelve el nuevo estado o `InvalidTransition`
    pub fn transition(self, next: ReservationStatus) -> AppResult<ReservationStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(ReservationStatus::Pending),
            "CONFIRMED" => Ok(ReservationStatus::Confirmed),
            "CANCELED" | "CANCELLED" => Ok(ReservationStatus::Canceled),
            "COMPLETED" => Ok(ReservationStatus::Completed),
            "REJECTED" => Ok(ReservationStatus::Rejected),
            _ => Err(ParseEnumError::new("ReservationStatus", s)),
        }
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reservation principal - mapea a la tabla reservations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub route_id: i32,
    pub transport_id: i32,
    pub date_time: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub price: f64,
    pub is_paid: bool,
    pub round_trip: bool,
    pub return_date_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para crear una reserva. `price` ausente o cero se calcula
/// a partir de la ruta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    #[serde(default)]
    pub user_id: i32,
    pub route_id: i32,
    pub transport_id: i32,
    pub date_time: DateTime<Utc>,
    #[serde(default)]
    pub status: ReservationStatus,
    pub price: Option<f64>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub round_trip: bool,
    pub return_date_time: Option<DateTime<Utc>>,
}

impl NewReservation {
    /// Reglas de negocio previas a la persistencia
    pub fn check(&self) -> AppResult<()> {
        check_references(self.route_id, self.transport_id)?;
        if let Some(price) = self.price {
            if price < 0.0 || !price.is_finite() {
                return Err(AppError::ValidationError(format!("Invalid price {}", price)));
            }
        }
        if !matches!(self.status, ReservationStatus::Pending | ReservationStatus::Confirmed) {
            return Err(AppError::ValidationError(format!(
                "A reservation cannot be created in status {}",
                self.status
            )));
        }
        check_return(self.round_trip, self.date_time, self.return_date_time)
    }
}

/// Ruta y transporte son obligatorios (0 = sin asignar)
pub fn check_references(route_id: i32, transport_id: i32) -> AppResult<()> {
    if route_id == 0 {
        return Err(AppError::ValidationError("routeId is required".to_string()));
    }
    if transport_id == 0 {
        return Err(AppError::ValidationError("transportId is required".to_string()));
    }
    Ok(())
}

/// Un viaje de ida y vuelta necesita una fecha de regreso posterior a la salida
pub fn check_return(
    round_trip: bool,
    date_time: DateTime<Utc>,
    return_date_time: Option<DateTime<Utc>>,
) -> AppResult<()> {
    match (round_trip, return_date_time) {
        (true, None) => Err(AppError::ValidationError(
            "returnDateTime is required for a round trip".to_string(),
        )),
        (true, Some(ret)) if ret < date_time => Err(AppError::ValidationError(
            "returnDateTime must not be before dateTime".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Request para cambiar el estado de una reserva
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: ReservationStatus,
}

/// Request para confirmar una reserva
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub is_paid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_transition_table() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Canceled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Canceled));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Rejected));
        for terminal in [Completed, Rejected, Canceled] {
            assert!(terminal.is_terminal());
            for next in [Pending, Confirmed, Canceled, Completed, Rejected] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_transition_error() {
        let err = Completed.transition(Canceled).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("CONFIRMED".parse::<ReservationStatus>().unwrap(), Confirmed);
        assert_eq!("cancelled".parse::<ReservationStatus>().unwrap(), Canceled);
        assert!("UNKNOWN".parse::<ReservationStatus>().is_err());
        assert_eq!(serde_json::to_string(&Confirmed).unwrap(), "\"CONFIRMED\"");
    }

    #[test]
    fn test_round_trip_requires_return() {
        let now = Utc::now();
        assert!(check_return(true, now, None).is_err());
        assert!(check_return(true, now, Some(now - chrono::Duration::hours(1))).is_err());
        assert!(check_return(true, now, Some(now + chrono::Duration::hours(5))).is_ok());
        assert!(check_return(false, now, None).is_ok());
    }
}
